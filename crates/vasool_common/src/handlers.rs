// --- File: crates/vasool_common/src/handlers.rs ---

// Handlers shared by every build of the shell: health and the session
// endpoints backed by the auth collaborator.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AuthClient, LoginRequest, SignupRequest, UserProfile};
use crate::http::handle_json_result;
use crate::logging::log_error;

/// Called after a successful sign-out, e.g. to drop session-scoped caches.
pub type SignOutHook = Arc<dyn Fn() + Send + Sync>;

/// State for the common routes.
#[derive(Clone)]
pub struct CommonState {
    pub auth: AuthClient,
    on_sign_out: Vec<SignOutHook>,
}

impl CommonState {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            on_sign_out: Vec::new(),
        }
    }

    pub fn with_sign_out_hook(mut self, hook: SignOutHook) -> Self {
        self.on_sign_out.push(hook);
        self
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub authenticated: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Shell is up", body = HealthResponse)),
    tag = "Session"
))]
pub async fn health_handler(State(state): State<Arc<CommonState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        authenticated: state.auth.session().is_authenticated(),
    })
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Rejected credentials")
    ),
    tag = "Session"
))]
pub async fn login_handler(
    State(state): State<Arc<CommonState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, Response> {
    let result = state.auth.login(&request).await.map(|user| SessionResponse {
        authenticated: true,
        user,
    });
    handle_json_result(result)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and signed in", body = SessionResponse),
        (status = 400, description = "Rejected sign-up")
    ),
    tag = "Session"
))]
pub async fn signup_handler(
    State(state): State<Arc<CommonState>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<SessionResponse>, Response> {
    let result = state.auth.signup(&request).await.map(|user| SessionResponse {
        authenticated: true,
        user,
    });
    handle_json_result(result)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Signed out")),
    tag = "Session"
))]
pub async fn logout_handler(State(state): State<Arc<CommonState>>) -> Response {
    match state.auth.logout() {
        Ok(()) => {
            for hook in &state.on_sign_out {
                hook();
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            log_error(&e, "Sign-out failed");
            e.into_response()
        }
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = SessionResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "Session"
))]
pub async fn me_handler(
    State(state): State<Arc<CommonState>>,
) -> Result<Json<SessionResponse>, Response> {
    let result = state.auth.me().await.map(|user| SessionResponse {
        authenticated: true,
        user: Some(user),
    });
    handle_json_result(result)
}
