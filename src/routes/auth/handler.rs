use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::{
    AppState,
    database::{
        models::user::UserEntity,
        operations::{JwtOperations, UserOperations},
    },
    emails::EmailUtil,
    error::{AppError, error_codes},
    middleware::CurrentUser,
    utils::{
        create_access_token, create_refresh_token, generate_otp, get_random, hash_password,
        refresh_token_is_valid, success_message, success_to_api_response, verify_password,
    },
};

use super::model::{
    EmailRequest, LoginRequest, RegisterData, RegisterRequest, SetNewPasswordRequest, TokenRequest,
    TokensData, VerifyOtpRequest, validate_email, validate_name, validate_password,
};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// 生成OTP、写入用户记录并投递邮件
async fn issue_otp(state: &AppState, user: &UserEntity, purpose: &str) -> Result<(), AppError> {
    let code = generate_otp();
    let expires_at = Utc::now() + Duration::minutes(state.config.otp_expire_mins as i64);
    UserOperations::set_otp(&state.pool, user.id, code, expires_at).await?;
    EmailUtil::send_otp(&state.config, &user.email, &user.full_name(), code, purpose);
    Ok(())
}

/// 签发并持久化一对访问/刷新令牌
async fn issue_token_pair(state: &AppState, user_id: uuid::Uuid) -> Result<TokensData, AppError> {
    let access = create_access_token(user_id, &state.config)?;
    let refresh = create_refresh_token(&state.config)?;
    JwtOperations::create(&state.pool, user_id, &access, &refresh).await?;
    Ok(TokensData { access, refresh })
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_name("first_name", &req.first_name)?;
    validate_name("last_name", &req.last_name)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    if UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::validation("email", "Email already registered!"));
    }

    let password_hash = hash_password(&req.password)?;
    let user = UserOperations::create(
        &state.pool,
        &req.first_name,
        &req.last_name,
        &req.email,
        &password_hash,
    )
    .await?;

    issue_otp(&state, &user, "account verification").await?;

    Ok((
        StatusCode::CREATED,
        success_to_api_response(
            "Registration successful",
            RegisterData { email: req.email },
        ),
    ))
}

#[axum::debug_handler]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::new(
                error_codes::INCORRECT_EMAIL,
                "Incorrect Email",
                StatusCode::NOT_FOUND,
            )
        })?;

    if user.is_email_verified {
        return Ok(success_message("Email already verified"));
    }

    if user.otp_code != Some(req.otp) {
        return Err(AppError::new(
            error_codes::INCORRECT_OTP,
            "Incorrect Otp",
            StatusCode::NOT_FOUND,
        ));
    }
    if user.is_otp_expired() {
        return Err(AppError::new(
            error_codes::EXPIRED_OTP,
            "Expired Otp",
            StatusCode::GONE,
        ));
    }

    UserOperations::mark_email_verified(&state.pool, user.id).await?;

    EmailUtil::welcome_email(&state.config, &user.email, &user.full_name());
    Ok(success_message("Account verification successful"))
}

#[axum::debug_handler]
pub async fn resend_verification_email(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::new(
                error_codes::INCORRECT_EMAIL,
                "Incorrect Email",
                StatusCode::NOT_FOUND,
            )
        })?;

    if user.is_email_verified {
        return Ok(success_message("Email already verified"));
    }

    issue_otp(&state, &user, "account verification").await?;
    Ok(success_message("Verification email sent"))
}

#[axum::debug_handler]
pub async fn send_password_reset_otp(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::new(
                error_codes::INCORRECT_EMAIL,
                "Incorrect Email",
                StatusCode::NOT_FOUND,
            )
        })?;

    issue_otp(&state, &user, "password reset").await?;
    Ok(success_message("Password otp sent"))
}

#[axum::debug_handler]
pub async fn set_new_password(
    State(state): State<AppState>,
    Json(req): Json<SetNewPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_password(&req.password)?;

    let user = UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| {
            AppError::new(
                error_codes::INCORRECT_EMAIL,
                "Incorrect Email",
                StatusCode::NOT_FOUND,
            )
        })?;

    if user.otp_code != Some(req.otp) {
        return Err(AppError::new(
            error_codes::INCORRECT_OTP,
            "Incorrect Otp",
            StatusCode::NOT_FOUND,
        ));
    }
    if user.is_otp_expired() {
        return Err(AppError::new(
            error_codes::EXPIRED_OTP,
            "Expired Otp",
            StatusCode::GONE,
        ));
    }

    let password_hash = hash_password(&req.password)?;
    UserOperations::set_password(&state.pool, user.id, &password_hash).await?;

    EmailUtil::password_reset_confirmation(&state.config, &user.email, &user.full_name());
    Ok(success_message("Password reset successful"))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid_credentials = || {
        AppError::unauthorized(error_codes::INVALID_CREDENTIALS, "Invalid credentials")
    };

    let user = UserOperations::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    if !user.is_email_verified {
        return Err(AppError::unauthorized(
            error_codes::UNVERIFIED_USER,
            "Verify your email first",
        ));
    }

    let tokens = issue_token_pair(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        success_to_api_response("Login successful", tokens),
    ))
}

#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid_refresh = || {
        AppError::unauthorized(
            error_codes::INVALID_TOKEN,
            "Refresh token is invalid or expired",
        )
    };

    let jwt = JwtOperations::find_by_refresh(&state.pool, &req.token)
        .await?
        .ok_or_else(invalid_refresh)?;

    if !refresh_token_is_valid(&req.token, &state.config) {
        return Err(invalid_refresh());
    }

    let access = create_access_token(jwt.user_id, &state.config)?;
    let refresh = create_refresh_token(&state.config)?;
    JwtOperations::update_pair(&state.pool, jwt.id, &access, &refresh).await?;

    Ok((
        StatusCode::CREATED,
        success_to_api_response("Tokens refresh successful", TokensData { access, refresh }),
    ))
}

#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    sub: Option<String>,
    aud: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// 调用Google tokeninfo接口校验ID Token
async fn validate_google_token(
    state: &AppState,
    token: &str,
) -> Result<GoogleTokenInfo, AppError> {
    let invalid_token = || {
        AppError::unauthorized(error_codes::INVALID_TOKEN, "Invalid Auth Token")
    };

    let response = reqwest::Client::new()
        .get(GOOGLE_TOKENINFO_URL)
        .query(&[("id_token", token)])
        .send()
        .await
        .map_err(|e| {
            tracing::warn!("Google tokeninfo request failed: {}", e);
            invalid_token()
        })?;

    if !response.status().is_success() {
        return Err(invalid_token());
    }

    let info: GoogleTokenInfo = response.json().await.map_err(|e| {
        tracing::warn!("Google tokeninfo response unreadable: {}", e);
        invalid_token()
    })?;

    if info.sub.is_none() {
        return Err(AppError::unauthorized(
            error_codes::INVALID_TOKEN,
            "Invalid Google ID Token",
        ));
    }
    if info.aud.as_deref() != Some(state.config.google_client_id.as_str()) {
        return Err(AppError::unauthorized(
            error_codes::INVALID_CLIENT_ID,
            "Invalid Client ID",
        ));
    }

    Ok(info)
}

/// 首次Google登录时建档，邮箱直接视为已验证
async fn store_google_user(state: &AppState, info: &GoogleTokenInfo) -> Result<UserEntity, AppError> {
    let email = info.email.as_deref().ok_or_else(|| {
        AppError::unauthorized(error_codes::INVALID_TOKEN, "Invalid Google ID Token")
    })?;

    if let Some(user) = UserOperations::find_by_email(&state.pool, email).await? {
        return Ok(user);
    }

    let name = info.name.as_deref().unwrap_or("");
    let mut parts = name.split_whitespace();
    let first_name = parts.next().unwrap_or("User").to_string();
    let last_name = parts.collect::<Vec<_>>().join(" ");

    let password_hash = hash_password(&get_random(12))?;
    let user = UserOperations::create_verified(
        &state.pool,
        &first_name,
        &last_name,
        email,
        &password_hash,
        info.picture.as_deref(),
    )
    .await?;

    EmailUtil::welcome_email(&state.config, &user.email, &user.full_name());
    Ok(user)
}

#[axum::debug_handler]
pub async fn google_login(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let info = validate_google_token(&state, &req.token).await?;
    let user = store_google_user(&state, &info).await?;

    let tokens = issue_token_pair(&state, user.id).await?;
    Ok((
        StatusCode::CREATED,
        success_to_api_response("Tokens created successfully", tokens),
    ))
}

#[axum::debug_handler]
pub async fn logout(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    JwtOperations::delete_by_user_and_access(
        &state.pool,
        current.user.id,
        &current.access_token,
    )
    .await?;
    Ok(success_message("Logout successful"))
}

#[axum::debug_handler]
pub async fn logout_all(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    JwtOperations::delete_all_for_user(&state.pool, current.user.id).await?;
    Ok(success_message("Logout successful"))
}
