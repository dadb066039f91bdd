use axum::{
    Extension,
    extract::{Json, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    database::operations::UserOperations,
    error::AppError,
    middleware::CurrentUser,
    routes::auth::validate_name,
    utils::success_to_api_response,
};

use super::model::{ProfileData, UserUpdateRequest};

#[axum::debug_handler]
pub async fn get_user(
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success_to_api_response(
        "Profile retrieved successfully",
        ProfileData::from(&current.user),
    ))
}

#[axum::debug_handler]
pub async fn update_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(req): Json<UserUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_name("first_name", &req.first_name)?;
    validate_name("last_name", &req.last_name)?;
    if let Some(bio) = &req.bio {
        if bio.len() > 200 {
            return Err(AppError::validation("bio", "200 characters max"));
        }
    }

    let user = UserOperations::update_profile(
        &state.pool,
        current.user.id,
        &req.first_name,
        &req.last_name,
        req.bio.as_deref(),
        req.dob,
    )
    .await?;

    Ok(success_to_api_response(
        "Profile updated successfully",
        ProfileData::from(&user),
    ))
}
