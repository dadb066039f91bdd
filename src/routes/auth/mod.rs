mod handler;
mod model;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware::auth_middleware};

pub use handler::{
    google_login, login, logout, logout_all, refresh, register, resend_verification_email,
    send_password_reset_otp, set_new_password, verify_email,
};
pub use model::validate_name;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification-otp", post(resend_verification_email))
        .route("/send-password-reset-otp", post(send_password_reset_otp))
        .route("/set-new-password", post(set_new_password))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/google-login", post(google_login));

    let protected = Router::new()
        .route("/logout", get(logout))
        .route("/logout-all", get(logout_all))
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}
