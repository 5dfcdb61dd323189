use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Directory holding `default.*` and `{RUN_ENV}.*` config files when
/// `VASOOL_CONFIG_DIR` is not set.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `config/default` (any format supported by the `config` crate)
/// 2. `config/{RUN_ENV}` (RUN_ENV defaults to `debug`)
/// 3. Environment variables `VASOOL__SECTION__KEY`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("VASOOL_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    load_config_from(&config_dir, &run_env)
}

/// Loads the configuration from an explicit directory and run environment.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigError> {
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    debug!("config: default_path: {}", default_path.display());
    debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` selects another file; the default is `.env`. A missing
/// file is not an error. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DEFAULT_TOML: &str = r#"
use_zoho = true

[server]
host = "127.0.0.1"
port = 3000

[backend]
base_url = "https://backend.example.com/"

[session]
path = "session.json"

[zoho]
success_redirect = "/dashboard"
"#;

    #[test]
    fn test_load_config_from_defaults_and_env_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("default.toml"), DEFAULT_TOML).unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 4100\n",
        )
        .unwrap();

        let config = load_config_from(dir.path(), "staging").expect("config should load");

        assert_eq!(config.server.port, 4100);
        assert!(config.use_zoho);
        assert_eq!(config.backend.api_prefix, "/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.session.token_key, "authToken");

        let zoho = config.zoho.expect("zoho section present");
        assert_eq!(zoho.callback_path, "/zoho/callback");
        assert_eq!(zoho.success_redirect, "/dashboard");
        assert_eq!(zoho.success_redirect_delay_ms, 2000);
    }

    #[test]
    fn test_missing_mandatory_section_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 3000\n",
        )
        .unwrap();

        assert!(load_config_from(dir.path(), "debug").is_err());
    }

    #[test]
    fn test_api_root_joins_prefix() {
        let backend = BackendConfig {
            base_url: "https://backend.example.com/".to_string(),
            api_prefix: "/api/".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(backend.api_root(), "https://backend.example.com/api");

        let bare = BackendConfig {
            api_prefix: String::new(),
            ..backend
        };
        assert_eq!(bare.api_root(), "https://backend.example.com");
    }
}
