mod handler;
mod model;

use axum::{Router, routing::get};

use crate::{AppState, middleware::auth_middleware};

pub use handler::{get_user, update_user};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_user).put(update_user))
        .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}
