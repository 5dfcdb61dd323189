//! Environment variable naming for the Vasool client.
//!
//! Configuration values can be overridden from the environment using the
//! `VASOOL__SECTION__KEY` pattern, e.g. `VASOOL__BACKEND__BASE_URL`.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "VASOOL";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "backend.base_url")
///
/// # Returns
///
/// The environment variable name (e.g., "VASOOL__BACKEND__BASE_URL")
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}
