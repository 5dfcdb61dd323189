// --- File: crates/vasool_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Local Shell Server Config ---
// The address the client shell listens on. The OAuth redirect URI registered
// with Zoho must point at this host and port.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Remote Backend Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    pub base_url: String, // e.g. https://app.vasool.ai, loaded via VASOOL__BACKEND__BASE_URL
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl BackendConfig {
    /// Base URL joined with the API prefix, without a trailing slash.
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }
}

// --- Session Store Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub path: String, // JSON file holding the persisted session
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_token_key() -> String {
    "authToken".to_string()
}

// --- Zoho Books Config ---
// Client side only. OAuth client id/secret live on the backend or are typed in
// by the user, never here.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ZohoConfig {
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
    #[serde(default = "default_success_redirect")]
    pub success_redirect: String,
    #[serde(default = "default_success_redirect_delay_ms")]
    pub success_redirect_delay_ms: u64,
}

fn default_callback_path() -> String {
    "/zoho/callback".to_string()
}

fn default_success_redirect() -> String {
    "/dashboard".to_string()
}

fn default_success_redirect_delay_ms() -> u64 {
    2000
}

impl Default for ZohoConfig {
    fn default() -> Self {
        Self {
            callback_path: default_callback_path(),
            success_redirect: default_success_redirect(),
            success_redirect_delay_ms: default_success_redirect_delay_ms(),
        }
    }
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,     // trace | debug | info | warn | error
    pub directory: Option<String>, // enables the daily rolling file layer
    #[serde(default)]
    pub journald: bool,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_zoho: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub zoho: Option<ZohoConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}
