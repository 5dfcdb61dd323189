// --- File: crates/vasool_common/src/http/client.rs ---
use reqwest::{Client, Error as ReqwestError, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use vasool_config::BackendConfig;

use crate::error::{external_service_error, VasoolError};

/// Name used when backend failures are reported as external service errors.
pub const BACKEND_SERVICE_NAME: &str = "Vasool backend";

/// Creates a new HTTP client with custom configuration.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for the client
/// * `follow_redirects` - Whether the client should follow redirects
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        })
        .build()
}

/// Failure of a single backend call.
#[derive(Error, Debug)]
pub enum ApiFailure {
    /// The request never produced a response (DNS, connect, timeout, ...)
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("backend returned status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The 2xx body did not match the expected shape
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiFailure::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// 401 and 403 mean the session token is missing, expired or rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl From<ApiFailure> for VasoolError {
    fn from(err: ApiFailure) -> Self {
        match err {
            ApiFailure::Transport(e) => VasoolError::HttpError(e.to_string()),
            ApiFailure::Status { status, detail } if status == 401 || status == 403 => {
                VasoolError::AuthError(detail.unwrap_or_else(|| "Not authenticated".to_string()))
            }
            ApiFailure::Status { status, detail } => external_service_error(
                BACKEND_SERVICE_NAME,
                detail.unwrap_or_else(|| format!("status {}", status)),
            ),
            ApiFailure::Decode(e) => VasoolError::ParseError(e.to_string()),
        }
    }
}

/// Pulls a human readable message out of an error body.
///
/// The backend answers errors as `{"detail": ...}`; a non-string detail is
/// returned JSON encoded. `{"error": {"message": ...}}` and `{"message": ...}`
/// are accepted as well.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let detail = match value.get("detail") {
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    detail
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .or_else(|| value.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|d| !d.trim().is_empty())
}

/// JSON client for the remote Vasool REST backend.
///
/// Every path is relative to `{base_url}{api_prefix}`. Authenticated calls take
/// the bearer token explicitly; the client never reads the session itself.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    api_root: String,
}

impl BackendClient {
    /// Builds a client from the backend section of the configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, VasoolError> {
        let http = create_client(config.timeout_secs, false)?;
        Ok(Self::with_client(http, config.api_root()))
    }

    /// Builds a client around an existing reqwest client.
    pub fn with_client(http: Client, api_root: impl Into<String>) -> Self {
        Self {
            http,
            api_root: api_root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Absolute URL for an API path such as `/integrations/status`.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    pub async fn get_json<R>(&self, path: &str, token: Option<&str>) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let request = self.request(Method::GET, path, token);
        Self::send(request, path).await
    }

    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<R, ApiFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, token).json(body);
        Self::send(request, path).await
    }

    /// POST without a request body.
    pub async fn post_empty<R>(&self, path: &str, token: Option<&str>) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let request = self.request(Method::POST, path, token);
        Self::send(request, path).await
    }

    pub async fn delete_json<R>(&self, path: &str, token: Option<&str>) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let request = self.request(Method::DELETE, path, token);
        Self::send(request, path).await
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<R>(request: RequestBuilder, path: &str) -> Result<R, ApiFailure>
    where
        R: DeserializeOwned,
    {
        let response = request.send().await?;

        let status = response.status();
        let body_text = response.text().await?;

        debug!("[Backend] {} responded with {}", path, status);

        if status.is_success() {
            // 204 and friends: an empty body reads as JSON null
            let body = if body_text.trim().is_empty() {
                "null"
            } else {
                body_text.as_str()
            };
            Ok(serde_json::from_str(body)?)
        } else {
            let detail = extract_detail(&body_text);
            info!(
                "[Backend] {} failed with HTTP status: {}. Detail: {:?}",
                path, status, detail
            );
            Err(ApiFailure::Status {
                status: status.as_u16(),
                detail,
            })
        }
    }
}
