use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// 访问令牌的声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String, // 用户ID
    pub exp: i64,        // 过期时间
}

/// 刷新令牌的声明，data 为随机串，保证每次签发的令牌不同
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub data: String,
    pub exp: i64,
}

pub fn create_access_token(
    user_id: Uuid,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(
            config.access_token_expiration().as_secs() as i64
        ))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        user_id: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
}

pub fn create_refresh_token(config: &Config) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(
            config.refresh_token_expiration().as_secs() as i64,
        ))
        .expect("valid timestamp")
        .timestamp();

    let claims = RefreshClaims {
        data: get_random(10),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret_key.as_bytes()),
    )
}

/// 解码访问令牌，无效或过期返回 None
pub fn decode_jwt(token: &str, config: &Config) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// 校验刷新令牌本身是否有效（签名与过期时间）
pub fn refresh_token_is_valid(token: &str, config: &Config) -> bool {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.secret_key.as_bytes()),
        &Validation::default(),
    )
    .is_ok()
}

const RANDOM_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成指定长度的随机字母数字串
pub fn get_random(length: usize) -> String {
    let mut out = String::with_capacity(length);
    while out.len() < length {
        for byte in Uuid::new_v4().as_bytes() {
            if out.len() == length {
                break;
            }
            out.push(RANDOM_CHARSET[*byte as usize % RANDOM_CHARSET.len()] as char);
        }
    }
    out
}

/// 生成6位数字OTP
pub fn generate_otp() -> i32 {
    let bytes = Uuid::new_v4().into_bytes();
    let n = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    (n % 900_000) as i32 + 100_000
}

/// 统一的响应信封
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(message: &str, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        status: "success",
        message: message.to_string(),
        data: Some(data),
    })
}

pub fn success_message(message: &str) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        status: "success",
        message: message.to_string(),
        data: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            redis_url: String::new(),
            secret_key: "test-secret".to_string(),
            access_token_expire_mins: 60,
            refresh_token_expire_mins: 1440,
            otp_expire_mins: 15,
            google_client_id: "client-id".to_string(),
            rate_limit_window_secs: 60,
            rate_limit_requests: 100,
            cache_default_ttl_secs: 300,
            default_from_email: "noreply@example.com".to_string(),
            server_host: "::".to_string(),
            server_port: 8000,
        }
    }

    #[test]
    fn access_token_roundtrip() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, &config).unwrap();
        let claims = decode_jwt(&token, &config).unwrap();
        assert_eq!(claims.user_id, user_id.to_string());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let config = test_config();
        let mut other = test_config();
        other.secret_key = "other-secret".to_string();
        let token = create_access_token(Uuid::new_v4(), &config).unwrap();
        assert!(decode_jwt(&token, &other).is_none());
    }

    #[test]
    fn refresh_tokens_differ_between_issues() {
        let config = test_config();
        let first = create_refresh_token(&config).unwrap();
        let second = create_refresh_token(&config).unwrap();
        assert_ne!(first, second);
        assert!(refresh_token_is_valid(&first, &config));
        assert!(!refresh_token_is_valid("not-a-token", &config));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("strongpassword").unwrap();
        assert!(verify_password("strongpassword", &hash).unwrap());
        assert!(!verify_password("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn otp_is_six_digits() {
        for _ in 0..32 {
            let otp = generate_otp();
            assert!((100_000..=999_999).contains(&otp));
        }
    }

    #[test]
    fn random_string_has_requested_length() {
        assert_eq!(get_random(10).len(), 10);
        assert_eq!(get_random(40).len(), 40);
    }

    #[test]
    fn success_envelope_omits_missing_data() {
        let json = serde_json::to_value(&success_message("Logout successful").0).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "message": "Logout successful"})
        );
    }
}
