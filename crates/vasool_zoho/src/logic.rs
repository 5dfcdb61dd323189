// --- File: crates/vasool_zoho/src/logic.rs ---
//! Calls to the backend's Zoho Books integration endpoints.
//!
//! The backend owns the OAuth app, the `state` bookkeeping and the token
//! exchange. This side only asks for URLs, forwards the redirect parameters and
//! reads the resulting status.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vasool_common::models::{DemoConnectionResult, IntegrationStatus, OAuthClientCredentials};
use vasool_common::{ApiFailure, BackendClient, CallbackExchange};

use crate::error::ZohoError;

pub const AUTH_URL_PATH: &str = "/integrations/zoho/auth-url";
pub const USER_OAUTH_SETUP_PATH: &str = "/integrations/zoho/user-oauth-setup";
pub const DEMO_CONNECT_PATH: &str = "/integrations/zoho/demo-connect";
pub const CALLBACK_PATH: &str = "/integrations/zoho/callback";
pub const DISCONNECT_PATH: &str = "/integrations/zoho/disconnect";
pub const STATUS_PATH: &str = "/integrations/status";

// --- Wire types ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackExchangeRequest {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackExchangeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisconnectResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// --- Backend calls ---

/// `GET /integrations/zoho/auth-url`.
///
/// A 4xx other than 401/403 means the backend has no OAuth app configured and
/// is reported as [`ZohoError::ConfigMissing`].
pub async fn fetch_auth_url(backend: &BackendClient, token: &str) -> Result<String, ZohoError> {
    debug!("Requesting Zoho authorization URL");
    let response: AuthUrlResponse = backend
        .get_json(AUTH_URL_PATH, Some(token))
        .await
        .map_err(classify_auth_url_failure)?;
    non_empty_auth_url(response)
}

/// `POST /integrations/zoho/user-oauth-setup` with the user's own OAuth app.
pub async fn submit_user_oauth_setup(
    backend: &BackendClient,
    token: &str,
    credentials: &OAuthClientCredentials,
) -> Result<String, ZohoError> {
    info!(
        "Submitting user OAuth app (client id {}, organization {:?})",
        credentials.client_id, credentials.organization_id
    );
    let response: AuthUrlResponse = backend
        .post_json(USER_OAUTH_SETUP_PATH, credentials, Some(token))
        .await?;
    non_empty_auth_url(response)
}

/// `POST /integrations/zoho/demo-connect`.
pub async fn demo_connect(
    backend: &BackendClient,
    token: &str,
) -> Result<DemoConnectionResult, ZohoError> {
    info!("Requesting demo-mode Zoho connection");
    Ok(backend.post_empty(DEMO_CONNECT_PATH, Some(token)).await?)
}

/// `POST /integrations/zoho/callback` with the redirect's `code` and `state`.
///
/// A `{success: false}` body is a rejection, not an error; its detail is kept.
pub async fn exchange_callback(
    backend: &BackendClient,
    token: &str,
    code: &str,
    state: &str,
) -> Result<CallbackExchange, ZohoError> {
    let body = CallbackExchangeRequest {
        code: code.to_string(),
        state: state.to_string(),
    };
    let response: CallbackExchangeResponse =
        backend.post_json(CALLBACK_PATH, &body, Some(token)).await?;

    if !response.success {
        warn!("Backend rejected the Zoho callback exchange");
    }
    Ok(CallbackExchange {
        success: response.success,
        detail: response
            .detail
            .or(response.message)
            .filter(|d| !d.trim().is_empty()),
    })
}

/// `GET /integrations/status`.
pub async fn fetch_status(
    backend: &BackendClient,
    token: &str,
) -> Result<IntegrationStatus, ZohoError> {
    Ok(backend.get_json(STATUS_PATH, Some(token)).await?)
}

/// `DELETE /integrations/zoho/disconnect`.
pub async fn disconnect(backend: &BackendClient, token: &str) -> Result<(), ZohoError> {
    let response: Option<DisconnectResponse> =
        backend.delete_json(DISCONNECT_PATH, Some(token)).await?;
    if let Some(message) = response.and_then(|r| r.message) {
        info!("Zoho Books disconnected: {}", message);
    }
    Ok(())
}

fn classify_auth_url_failure(failure: ApiFailure) -> ZohoError {
    match failure {
        ApiFailure::Status { status, detail }
            if (400..500).contains(&status) && status != 401 && status != 403 =>
        {
            info!(
                "Zoho OAuth not configured on the backend (status {}): {:?}",
                status, detail
            );
            ZohoError::ConfigMissing(detail)
        }
        other => other.into(),
    }
}

fn non_empty_auth_url(response: AuthUrlResponse) -> Result<String, ZohoError> {
    if response.auth_url.trim().is_empty() {
        return Err(ZohoError::Backend {
            status: 200,
            detail: Some("Backend returned an empty authorization URL".to_string()),
        });
    }
    Ok(response.auth_url)
}
