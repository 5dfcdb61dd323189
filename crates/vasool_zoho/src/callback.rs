// --- File: crates/vasool_zoho/src/callback.rs ---
//! Callback Handler for the redirect back from Zoho.
//!
//! Runs once per landing on the callback route: parse the query, exchange
//! `{code, state}` through the backend, report a terminal outcome. Replayed or
//! unknown `state` values are rejected by the backend and reported as failures.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;
use vasool_common::{Navigator, Session};
use vasool_config::ZohoConfig;

use crate::error::{ZohoError, GENERIC_CALLBACK_FAILURE, SIGN_IN_AGAIN};
use crate::service::SharedZohoService;
use crate::status::StatusReader;

/// Raw query parameters of the redirect. Names are fixed by Zoho.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema, utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// What the redirect carried, once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    Authorized { code: String, state: String },
    Denied { error: String, description: Option<String> },
}

impl CallbackParams {
    /// Parses a raw query string, with or without the leading `?`.
    pub fn from_query(raw: &str) -> Result<Self, ZohoError> {
        serde_urlencoded::from_str(raw.trim_start_matches('?')).map_err(|e| {
            warn!("Unreadable callback query: {}", e);
            ZohoError::InvalidCallback
        })
    }

    /// An `error` wins over everything else; otherwise both `code` and `state`
    /// must be present and non-empty.
    pub fn into_result(self) -> Result<CallbackResult, ZohoError> {
        if let Some(error) = non_empty(self.error) {
            return Ok(CallbackResult::Denied {
                error,
                description: non_empty(self.error_description),
            });
        }
        match (non_empty(self.code), non_empty(self.state)) {
            (Some(code), Some(state)) => Ok(CallbackResult::Authorized { code, state }),
            _ => Err(ZohoError::InvalidCallback),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    Processing,
    Succeeded,
    Failed,
}

impl CallbackStatus {
    pub fn title(&self) -> &'static str {
        match self {
            CallbackStatus::Processing => "Connecting...",
            CallbackStatus::Succeeded => "Connected!",
            CallbackStatus::Failed => "Connection Failed",
        }
    }
}

/// Redirect scheduled after a successful exchange.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledRedirect {
    pub path: String,
    pub delay_ms: u64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackOutcome {
    pub status: CallbackStatus,
    pub title: String,
    pub message: String,
    pub redirect: Option<ScheduledRedirect>,
    /// Manual way back, offered on failure only.
    pub back_to: Option<String>,
}

impl CallbackOutcome {
    pub fn processing() -> Self {
        Self {
            status: CallbackStatus::Processing,
            title: CallbackStatus::Processing.title().to_string(),
            message: "Connecting to Zoho Books...".to_string(),
            redirect: None,
            back_to: None,
        }
    }

    fn succeeded(redirect: ScheduledRedirect) -> Self {
        Self {
            status: CallbackStatus::Succeeded,
            title: CallbackStatus::Succeeded.title().to_string(),
            message: "Zoho Books connected successfully!".to_string(),
            redirect: Some(redirect),
            back_to: None,
        }
    }

    fn failed(message: String, dashboard: &str) -> Self {
        Self {
            status: CallbackStatus::Failed,
            title: CallbackStatus::Failed.title().to_string(),
            message,
            redirect: None,
            back_to: Some(dashboard.to_string()),
        }
    }
}

pub struct CallbackHandler {
    service: SharedZohoService,
    session: Arc<Session>,
    status: Arc<StatusReader>,
    config: ZohoConfig,
}

impl CallbackHandler {
    pub fn new(
        service: SharedZohoService,
        session: Arc<Session>,
        status: Arc<StatusReader>,
        config: ZohoConfig,
    ) -> Self {
        Self {
            service,
            session,
            status,
            config,
        }
    }

    /// Handles one landing on the callback route and returns its terminal
    /// outcome. The dashboard redirect is scheduled only after the exchange
    /// has finished, and only on success.
    pub async fn handle(&self, params: CallbackParams, navigator: &dyn Navigator) -> CallbackOutcome {
        let flow = Uuid::new_v4();
        let dashboard = self.config.success_redirect.as_str();

        let (code, state) = match params.into_result() {
            Ok(CallbackResult::Authorized { code, state }) => (code, state),
            Ok(CallbackResult::Denied { error, description }) => {
                warn!(%flow, "Zoho denied the authorization: {}", error);
                let message = match description {
                    Some(description) => format!("Connection failed: {} ({})", error, description),
                    None => format!("Connection failed: {}", error),
                };
                return CallbackOutcome::failed(message, dashboard);
            }
            Err(e) => {
                warn!(%flow, "Callback without code or state");
                return CallbackOutcome::failed(e.to_string(), dashboard);
            }
        };

        let Some(token) = self.session.token() else {
            warn!(%flow, "Callback reached without a signed-in session");
            return CallbackOutcome::failed(SIGN_IN_AGAIN.to_string(), dashboard);
        };

        info!(%flow, "Exchanging Zoho authorization code");
        let exchange = self.service.exchange_callback(&token, &code, &state).await;

        match exchange {
            Ok(result) if result.success => {
                if let Err(e) = self.status.refresh().await {
                    warn!(%flow, "Status refresh after connect failed: {}", e);
                }
                let delay = Duration::from_millis(self.config.success_redirect_delay_ms);
                navigator.schedule_redirect(dashboard, delay);
                info!(%flow, "Zoho Books connected");
                CallbackOutcome::succeeded(ScheduledRedirect {
                    path: dashboard.to_string(),
                    delay_ms: self.config.success_redirect_delay_ms,
                })
            }
            Ok(result) => {
                warn!(%flow, "Backend rejected the exchange: {:?}", result.detail);
                let message = result
                    .detail
                    .unwrap_or_else(|| GENERIC_CALLBACK_FAILURE.to_string());
                CallbackOutcome::failed(message, dashboard)
            }
            Err(e) => {
                warn!(%flow, "Zoho callback exchange failed: {}", e);
                let detail = match &e {
                    ZohoError::Auth(detail) => Some(detail.as_str()),
                    other => other.detail(),
                };
                let message = detail
                    .map(String::from)
                    .unwrap_or_else(|| GENERIC_CALLBACK_FAILURE.to_string());
                CallbackOutcome::failed(message, dashboard)
            }
        }
    }
}
