use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// 稳定的业务错误码，随错误响应一起返回给前端
pub mod error_codes {
    pub const UNAUTHORIZED_USER: &str = "unauthorized_user";
    pub const NETWORK_FAILURE: &str = "network_failure";
    pub const SERVER_ERROR: &str = "server_error";
    pub const INVALID_ENTRY: &str = "invalid_entry";
    pub const INCORRECT_EMAIL: &str = "incorrect_email";
    pub const INCORRECT_OTP: &str = "incorrect_otp";
    pub const EXPIRED_OTP: &str = "expired_otp";
    pub const INVALID_AUTH: &str = "invalid_auth";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const INVALID_CLIENT_ID: &str = "invalid_client_id";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const UNVERIFIED_USER: &str = "unverified_user";
    pub const NON_EXISTENT: &str = "non_existent";
    pub const INVALID_OWNER: &str = "invalid_owner";
    pub const INVALID_PAGE: &str = "invalid_page";
    pub const INVALID_VALUE: &str = "invalid_value";
    pub const NOT_ALLOWED: &str = "not_allowed";
    pub const INVALID_DATA_TYPE: &str = "invalid_data_type";
    pub const INVALID_QUERY_PARAM: &str = "invalid_query_param";
    pub const RATE_LIMIT_EXCEEDED: &str = "rate_limit_exceeded";
}

/// 领域错误，携带错误码、消息与HTTP状态码
#[derive(Debug)]
pub struct AppError {
    pub code: &'static str,
    pub message: String,
    pub status: StatusCode,
    pub data: Option<Value>,
}

impl AppError {
    pub fn new(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            message: message.into(),
            status,
            data: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::NON_EXISTENT, message, StatusCode::NOT_FOUND)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::UNAUTHORIZED)
    }

    pub fn invalid_owner(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_OWNER, message, StatusCode::FORBIDDEN)
    }

    pub fn invalid_query_param(message: impl Into<String>) -> Self {
        Self::new(
            error_codes::INVALID_QUERY_PARAM,
            message,
            StatusCode::BAD_REQUEST,
        )
    }

    /// 422 校验错误，data 为 {字段: 错误信息}
    pub fn validation(field: &str, field_err_msg: &str) -> Self {
        Self {
            code: error_codes::INVALID_ENTRY,
            message: "Invalid Entry".to_string(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
            data: Some(serde_json::json!({ field: field_err_msg })),
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(
            error_codes::SERVER_ERROR,
            message,
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorEnvelope {
            status: "failure",
            message: self.message,
            code: self.code,
            data: self.data,
        });
        (self.status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", e);
        Self::server_error("An unexpected error occurred")
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", e);
        Self::server_error("An unexpected error occurred")
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("Token encoding error: {:?}", e);
        Self::server_error("An unexpected error occurred")
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        tracing::error!("Upstream request failed: {:?}", e);
        Self::new(
            error_codes::NETWORK_FAILURE,
            "Network failure",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_map() {
        let err = AppError::validation("email", "Email already registered!");
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, error_codes::INVALID_ENTRY);
        assert_eq!(
            err.data,
            Some(serde_json::json!({"email": "Email already registered!"}))
        );
    }

    #[test]
    fn error_envelope_shape() {
        let envelope = ErrorEnvelope {
            status: "failure",
            message: "Post not found".to_string(),
            code: error_codes::NON_EXISTENT,
            data: None,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "failure",
                "message": "Post not found",
                "code": "non_existent",
            })
        );
    }
}
