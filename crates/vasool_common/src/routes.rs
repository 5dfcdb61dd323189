// --- File: crates/vasool_common/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    health_handler, login_handler, logout_handler, me_handler, signup_handler, CommonState,
};

/// Routes shared by every build: health and session management.
pub fn routes(state: Arc<CommonState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/signup", post(signup_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .with_state(state)
}
