use axum::{
    body::Body,
    extract::{RawPathParams, Request, State},
    http::header::CONTENT_TYPE,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::cache::keys::{build_cache_key, resolve_pattern};
use crate::cache::store::{CacheStore, CachedHttpResponse};
use crate::middleware::{CurrentUser, authenticate, bearer_token};

/// 匿名请求在键模板中的用户标识
const ANON_USER: &str = "anon";

/// 读接口的缓存配置，按路由声明
#[derive(Clone)]
pub struct CacheContext {
    pub state: AppState,
    pub template: &'static str,
    pub ttl: u64,
}

impl CacheContext {
    pub fn new(state: AppState, template: &'static str, ttl: u64) -> Self {
        Self {
            state,
            template,
            ttl,
        }
    }

    fn store(&self) -> CacheStore {
        CacheStore::new(self.state.redis.clone())
    }
}

/// 写接口的失效配置，按路由声明
#[derive(Clone)]
pub struct InvalidateContext {
    pub state: AppState,
    pub patterns: &'static [&'static str],
}

impl InvalidateContext {
    pub fn new(state: AppState, patterns: &'static [&'static str]) -> Self {
        Self { state, patterns }
    }
}

/// 路由级响应缓存
///
/// 键由模板、路径参数、用户ID与查询串摘要共同决定。
/// 认证只为拿到 {user_id}：未带令牌按匿名处理；
/// 带了无效令牌则直接返回认证层同样的401，不降级为匿名。
pub async fn cache_response(
    State(ctx): State<CacheContext>,
    params: RawPathParams,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = match bearer_token(request.headers()) {
        Ok(None) => ANON_USER.to_string(),
        Ok(Some(token)) => match authenticate(&ctx.state, token).await {
            Ok(user) => user.id.to_string(),
            Err(e) => return e.into_response(),
        },
        Err(e) => return e.into_response(),
    };

    let mut key_params: Vec<(&str, &str)> = Vec::new();
    for (name, value) in &params {
        key_params.push((name, value));
    }
    key_params.push(("user_id", &user_id));

    let query = request.uri().query().unwrap_or("").to_string();
    let cache_key = build_cache_key(ctx.template, &key_params, &query);

    let store = ctx.store();
    if let Some(cached) = store.get::<CachedHttpResponse>(&cache_key).await {
        tracing::debug!("Cache HIT: {}", cache_key);
        return rebuild_response(cached);
    }

    tracing::debug!("Cache MISS: {}", cache_key);
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            // 响应体已被消费，读取失败时无法原样返回
            tracing::warn!("Failed to read response body for caching: {}", e);
            return crate::error::AppError::server_error("An unexpected error occurred")
                .into_response();
        }
    };

    let content_type = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    let cached = CachedHttpResponse {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        status: parts.status.as_u16(),
        content_type,
    };
    store.set(&cache_key, &cached, ctx.ttl).await;

    Response::from_parts(parts, Body::from(bytes))
}

/// 路由级缓存失效
///
/// 写操作成功后才解析并删除各失效模式；写失败不清缓存，
/// 残留的过期窗口由TTL兜底。
pub async fn invalidate_cache(
    State(ctx): State<InvalidateContext>,
    params: RawPathParams,
    request: Request<Body>,
    next: Next,
) -> Response {
    let user_id = request
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.user.id.to_string())
        .unwrap_or_else(|| ANON_USER.to_string());

    let mut pattern_params: Vec<(String, String)> = Vec::new();
    for (name, value) in &params {
        pattern_params.push((name.to_string(), value.to_string()));
    }
    pattern_params.push(("user_id".to_string(), user_id));

    let response = next.run(request).await;

    if response.status().is_client_error() || response.status().is_server_error() {
        return response;
    }

    let borrowed: Vec<(&str, &str)> = pattern_params
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let store = CacheStore::new(ctx.state.redis.clone());
    let mut total_deleted = 0u64;
    for pattern in ctx.patterns {
        let resolved = resolve_pattern(pattern, &borrowed);
        total_deleted += store.delete_pattern(&resolved).await;
    }
    tracing::debug!("Cache invalidation deleted {} keys", total_deleted);

    response
}

fn rebuild_response(cached: CachedHttpResponse) -> Response {
    Response::builder()
        .status(cached.status)
        .header(CONTENT_TYPE, cached.content_type)
        .body(Body::from(cached.content))
        .unwrap_or_else(|_| {
            crate::error::AppError::server_error("An unexpected error occurred").into_response()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuilt_response_replays_status_and_content_type() {
        let cached = CachedHttpResponse {
            content: r#"{"status":"success","message":"Posts returned successfully"}"#.to_string(),
            status: 200,
            content_type: "application/json".to_string(),
        };
        let response = rebuild_response(cached);
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
