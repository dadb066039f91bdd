use redis::{AsyncCommands, Client as RedisClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 缓存的HTTP响应，整体存取，命中时原样回放
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedHttpResponse {
    pub content: String,
    pub status: u16,
    pub content_type: String,
}

/// Redis响应缓存
/// 缓存只是优化，所有操作失败时降级为未命中/空操作，绝不让请求失败
#[derive(Clone)]
pub struct CacheStore {
    redis: Arc<RedisClient>,
}

impl CacheStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache GET error for key '{}': {}", key, e);
                return None;
            }
        };

        let result: Option<String> = match conn.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Cache GET error for key '{}': {}", key, e);
                return None;
            }
        };

        match result {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Cache deserialization error for key '{}': {}", key, e);
                    None
                }
            },
            None => None,
        }
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: u64) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Cache serialization error for key '{}': {}", key, e);
                return false;
            }
        };

        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache SET error for key '{}': {}", key, e);
                return false;
            }
        };

        match conn.set_ex::<_, _, ()>(key, json, ttl).await {
            Ok(()) => {
                tracing::debug!("Cache SET: {} (TTL: {}s)", key, ttl);
                true
            }
            Err(e) => {
                tracing::warn!("Cache SET error for key '{}': {}", key, e);
                false
            }
        }
    }

    pub async fn delete(&self, key: &str) -> bool {
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache DELETE error for key '{}': {}", key, e);
                return false;
            }
        };

        match conn.del::<_, ()>(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Cache DELETE error for key '{}': {}", key, e);
                false
            }
        }
    }

    /// 删除所有匹配通配模式的键，返回删除数量
    pub async fn delete_pattern(&self, pattern: &str) -> u64 {
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Cache DELETE_PATTERN error for pattern '{}': {}", pattern, e);
                return 0;
            }
        };

        let keys: Vec<String> = match conn.keys(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Cache DELETE_PATTERN error for pattern '{}': {}", pattern, e);
                return 0;
            }
        };

        if keys.is_empty() {
            tracing::debug!("No keys found for pattern: {}", pattern);
            return 0;
        }

        match conn.del::<_, u64>(&keys).await {
            Ok(deleted) => {
                tracing::info!(
                    "Cache INVALIDATE: {} keys deleted for pattern '{}'",
                    deleted,
                    pattern
                );
                deleted
            }
            Err(e) => {
                tracing::warn!("Cache DELETE_PATTERN error for pattern '{}': {}", pattern, e);
                0
            }
        }
    }
}
