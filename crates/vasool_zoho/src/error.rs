// --- File: crates/vasool_zoho/src/error.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use vasool_common::models::IntegrationKind;
use vasool_common::{
    config_error, conflict, external_service_error, ApiFailure, HttpStatusCode, VasoolError,
};

/// Fallback text when a failed connect attempt carries no backend detail.
pub const GENERIC_CONNECT_FAILURE: &str = "Failed to setup Zoho connection";

/// Fallback text when the callback exchange fails without a backend detail.
pub const GENERIC_CALLBACK_FAILURE: &str = "Failed to complete connection";

/// Shown when the session token is missing or was rejected.
pub const SIGN_IN_AGAIN: &str = "Please log in again.";

/// Zoho Books connection errors.
#[derive(Error, Debug)]
pub enum ZohoError {
    /// The integration is listed but not implemented yet
    #[error("{} is not available yet", .0.display_name())]
    NotAvailable(IntegrationKind),

    /// The backend has no OAuth app configured; the user may choose demo mode
    #[error("Zoho OAuth is not configured: {}", .0.as_deref().unwrap_or("no detail"))]
    ConfigMissing(Option<String>),

    /// The redirect back from Zoho lacks `code` or `state`
    #[error("Invalid callback parameters")]
    InvalidCallback,

    /// Any other non-2xx answer of the backend
    #[error("Backend returned status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Backend { status: u16, detail: Option<String> },

    /// The request could not complete
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Missing, expired or rejected session token
    #[error("Not authenticated: {0}")]
    Auth(String),

    /// User input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// A connect action is already running
    #[error("A connection attempt is already in progress")]
    InProgress,

    /// The action is not valid in the current phase
    #[error("Action not allowed while {0}")]
    InvalidState(&'static str),

    /// The backend answered with a body we could not read
    #[error("Failed to parse backend response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The Zoho section of the configuration is missing or disabled
    #[error("Zoho configuration missing or disabled")]
    Config,
}

impl ZohoError {
    /// Text shown to the user. Backend detail wins over the generic message.
    pub fn user_message(&self) -> String {
        match self {
            ZohoError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ZohoError::Backend { detail: None, .. } => GENERIC_CONNECT_FAILURE.to_string(),
            ZohoError::ConfigMissing(_) => {
                "Zoho OAuth is not configured. Use demo mode or configure your own Zoho app."
                    .to_string()
            }
            ZohoError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ZohoError::Auth(_) => SIGN_IN_AGAIN.to_string(),
            other => other.to_string(),
        }
    }

    /// Backend detail carried by this error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ZohoError::Backend { detail, .. } | ZohoError::ConfigMissing(detail) => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ZohoError::Auth(_))
    }
}

/// Classifies a backend client failure.
impl From<ApiFailure> for ZohoError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Transport(e) => ZohoError::Network(e),
            ApiFailure::Status { status, detail } if status == 401 || status == 403 => {
                ZohoError::Auth(detail.unwrap_or_else(|| "session token rejected".to_string()))
            }
            ApiFailure::Status { status, detail } => ZohoError::Backend { status, detail },
            ApiFailure::Decode(e) => ZohoError::Parse(e),
        }
    }
}

/// Convert ZohoError to VasoolError
impl From<ZohoError> for VasoolError {
    fn from(err: ZohoError) -> Self {
        match err {
            ZohoError::NotAvailable(kind) => VasoolError::ValidationError(format!(
                "{} is not available yet",
                kind.display_name()
            )),
            ZohoError::ConfigMissing(detail) => VasoolError::ConfigError(
                detail.unwrap_or_else(|| "Zoho OAuth is not configured".to_string()),
            ),
            ZohoError::InvalidCallback => {
                VasoolError::ValidationError("Invalid callback parameters".to_string())
            }
            e @ ZohoError::Backend { .. } => {
                external_service_error("Zoho Books", e.user_message())
            }
            ZohoError::Network(e) => VasoolError::HttpError(format!("Zoho request error: {}", e)),
            ZohoError::Auth(msg) => VasoolError::AuthError(msg),
            ZohoError::Validation(msg) => VasoolError::ValidationError(msg),
            ZohoError::InProgress => conflict("A connection attempt is already in progress"),
            ZohoError::InvalidState(phase) => {
                VasoolError::ConflictError(format!("Action not allowed while {}", phase))
            }
            ZohoError::Parse(e) => {
                VasoolError::ParseError(format!("Zoho response parse error: {}", e))
            }
            ZohoError::Config => config_error("Zoho configuration missing or disabled"),
        }
    }
}

impl HttpStatusCode for ZohoError {
    fn status_code(&self) -> u16 {
        match self {
            ZohoError::NotAvailable(_) => 400,
            ZohoError::ConfigMissing(_) => 409,
            ZohoError::InvalidCallback => 400,
            ZohoError::Backend { status, .. } if (400..600).contains(status) => *status,
            ZohoError::Backend { .. } => 502,
            ZohoError::Network(_) => 502,
            ZohoError::Auth(_) => 401,
            ZohoError::Validation(_) => 400,
            ZohoError::InProgress => 409,
            ZohoError::InvalidState(_) => 409,
            ZohoError::Parse(_) => 502,
            ZohoError::Config => 503,
        }
    }
}

/// JSON error body with the user-facing message. Config-missing answers also
/// carry `config_choice_required` so a client can offer demo mode.
impl IntoResponse for ZohoError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": {
                "message": self.user_message(),
                "detail": self.detail(),
                "code": status.as_u16(),
                "config_choice_required": matches!(self, ZohoError::ConfigMissing(_)),
            }
        });
        (status, Json(body)).into_response()
    }
}
