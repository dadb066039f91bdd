use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    AppState,
    database::{
        models::user::UserEntity,
        operations::{jwt::JwtOperations, user::UserOperations},
    },
    error::{AppError, error_codes},
    utils::decode_jwt,
};

/// 认证通过后写入请求扩展的当前用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserEntity,
    pub access_token: String,
}

fn missing_bearer() -> AppError {
    AppError::unauthorized(error_codes::INVALID_AUTH, "Auth Bearer not provided!")
}

fn invalid_token() -> AppError {
    AppError::unauthorized(error_codes::INVALID_TOKEN, "Auth Token is Invalid or Expired!")
}

/// 从请求头提取Bearer令牌
/// 无Authorization头返回 Ok(None)；有头但格式不对视为认证错误
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| missing_bearer())?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(Some(token)),
        _ => Err(missing_bearer()),
    }
}

/// 校验访问令牌：解码后还要求 jwts 表中存在对应记录（支持登出即失效）
pub async fn authenticate(state: &AppState, token: &str) -> Result<UserEntity, AppError> {
    let claims = decode_jwt(token, &state.config).ok_or_else(invalid_token)?;
    let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| invalid_token())?;

    let jwt = JwtOperations::find_by_user_and_access(&state.pool, user_id, token).await?;
    if jwt.is_none() {
        return Err(invalid_token());
    }

    UserOperations::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(invalid_token)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = match bearer_token(request.headers())? {
        Some(token) => token.to_string(),
        None => return Err(missing_bearer()),
    };

    let user = authenticate(&state, &token).await?;
    request.extensions_mut().insert(CurrentUser {
        user,
        access_token: token,
    });

    Ok(next.run(request).await)
}
