use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: i32,
}

#[derive(Debug, Deserialize)]
pub struct SetNewPasswordRequest {
    pub email: String,
    pub otp: i32,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 刷新与Google登录共用：token 为刷新令牌或 Google ID Token
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterData {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokensData {
    pub access: String,
    pub refresh: String,
}

pub fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() || value.len() > 50 {
        return Err(AppError::validation(field, "50 characters max"));
    }
    if value.contains(' ') {
        return Err(AppError::validation(field, "No spacing allowed"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') || email.len() > 254 {
        return Err(AppError::validation("email", "Invalid email"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::validation("password", "8 characters min"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_reject_spaces() {
        assert!(validate_name("first_name", "John").is_ok());
        assert!(validate_name("first_name", "John Doe").is_err());
        assert!(validate_name("first_name", "").is_err());
    }

    #[test]
    fn password_requires_minimum_length() {
        assert!(validate_password("strongpassword").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(validate_email("johndoe@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
