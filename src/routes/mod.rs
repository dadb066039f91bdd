pub mod auth;
pub mod blog;
pub mod profiles;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthCheckResponse {
    pub message: String,
}

pub async fn healthcheck() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        message: "pong".to_string(),
    })
}
