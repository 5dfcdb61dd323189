//! Feature flag handling for the Vasool client.
//!
//! ## Available Features
//!
//! - `openapi`: Enables OpenAPI documentation generation
//! - `zoho`: Enables the Zoho Books integration
//! - `mocks`: Exposes mockall doubles of the service traits for tests
//!
//! Compile-time flags decide which crates are linked in; the runtime `use_*`
//! flags in the configuration decide whether a linked integration is served.

#[cfg(feature = "zoho")]
use std::sync::Arc;
#[cfg(feature = "zoho")]
use vasool_config::AppConfig;

/// Check if the Zoho Books integration is enabled at runtime.
///
/// Only `use_zoho` matters: every key of the `[zoho]` section has a default,
/// so a missing section means "use the defaults".
#[cfg(feature = "zoho")]
pub fn is_zoho_enabled(config: &Arc<AppConfig>) -> bool {
    config.use_zoho
}
