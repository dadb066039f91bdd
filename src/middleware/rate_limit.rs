use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use redis::AsyncCommands;

use crate::{
    config::Config,
    error::{AppError, error_codes},
};

use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        Self {
            redis: Arc::new(redis),
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(self: Arc<Self>, req: Request<Body>, next: Next) -> Response {
        // 连接信息中的原始IP作为兜底
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());

        let ip = req
            .headers()
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .or_else(|| {
                req.headers()
                    .get("x-forwarded-for")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
            })
            .or_else(|| remote_ip.as_deref())
            .unwrap_or("unknown")
            .trim()
            .to_string();

        let key = format!("rate_limit:{}", ip);
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                // 限流依赖不可用时放行
                tracing::warn!("Rate limiter unavailable: {}", e);
                return next.run(req).await;
            }
        };

        let count: i64 = match conn.incr(&key, 1).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Rate limiter unavailable: {}", e);
                return next.run(req).await;
            }
        };

        if count == 1 {
            // 首次请求时设置窗口过期
            if let Err(e) = conn
                .expire::<_, ()>(&key, self.config.rate_limit_window().as_secs() as i64)
                .await
            {
                tracing::warn!("Failed to set rate limit window: {}", e);
            }
        }

        if count > self.config.rate_limit_requests as i64 {
            return AppError::new(
                error_codes::RATE_LIMIT_EXCEEDED,
                format!(
                    "Too many requests, retry in {} seconds",
                    self.config.rate_limit_window().as_secs()
                ),
                StatusCode::TOO_MANY_REQUESTS,
            )
            .into_response();
        }

        next.run(req).await
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    limiter.check_rate_limit(req, next).await
}
