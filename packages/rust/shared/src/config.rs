//! Configuration for the FT API client.
//!
//! Two concerns live here:
//! - the request configuration layers ([`DEFAULT_CONFIG`] and the per-client
//!   instance layer built by [`instance_config`]);
//! - the user config file at `~/.ftapi/ftapi.toml`, loaded into [`AppConfig`].
//!
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{FtApiError, Result};
use crate::types::Config;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ftapi.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ftapi";

// ---------------------------------------------------------------------------
// Request configuration layers
// ---------------------------------------------------------------------------

/// Key holding the API key in every instance configuration.
pub const API_KEY: &str = "apiKey";

/// Key holding the base path for content items.
pub const API_ITEM_PATH: &str = "apiItemPath";

/// Key holding the base path for site pages.
pub const PAGE_PATH: &str = "pagePath";

/// Key holding the suffix appended to a page path for its main content.
pub const PAGE_MAIN_CONTENT: &str = "pageMainContent";

/// Process-wide base layer. Read-only; clients copy it at construction.
pub static DEFAULT_CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::new()
        .with(API_ITEM_PATH, "http://api.ft.com/content/items/v1/")
        .with(PAGE_PATH, "http://api.ft.com/site/v1/pages/")
        .with(PAGE_MAIN_CONTENT, "/main-content")
});

/// Build a client's instance layer: [`DEFAULT_CONFIG`] plus `apiKey`.
///
/// Fails with [`FtApiError::InvalidArgument`] if the key is absent or empty.
/// The key is stored exactly as given.
pub fn instance_config(api_key: Option<&str>) -> Result<Config> {
    let api_key = api_key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| FtApiError::invalid_argument("an API key is required"))?;

    Ok(DEFAULT_CONFIG.merge(Some(&Config::new().with(API_KEY, api_key))))
}

// ---------------------------------------------------------------------------
// Config file structs (matching ftapi.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API access settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Call-level overrides applied to every request made by the CLI.
    #[serde(default)]
    pub overrides: Config,
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "FT_API_KEY".into()
}
fn default_timeout_secs() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ftapi/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FtApiError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ftapi/ftapi.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FtApiError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FtApiError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FtApiError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| FtApiError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FtApiError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the API key: an explicit value wins, then the configured env var.
pub fn resolve_api_key(explicit: Option<&str>, config: &AppConfig) -> Result<String> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    let var_name = &config.api.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(FtApiError::invalid_argument(format!(
            "FT API key not found. Pass --api-key or set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_config_carries_api_key() {
        let config = instance_config(Some("bar")).expect("valid key");
        assert_eq!(config.get_str(API_KEY), Some("bar"));
    }

    #[test]
    fn instance_config_includes_every_default() {
        let config = instance_config(Some("bar")).expect("valid key");
        for (key, value) in DEFAULT_CONFIG.iter() {
            assert_eq!(config.get(key), Some(value), "missing default {key}");
        }
        assert_eq!(config.len(), DEFAULT_CONFIG.len() + 1);
    }

    #[test]
    fn instance_config_rejects_missing_or_empty_key() {
        for key in [None, Some("")] {
            let err = instance_config(key).unwrap_err();
            assert!(matches!(err, FtApiError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn instance_config_keeps_key_verbatim() {
        let config = instance_config(Some(" bar ")).expect("non-empty key");
        assert_eq!(config.get_str(API_KEY), Some(" bar "));

        let config = instance_config(Some(" ")).expect("non-empty key");
        assert_eq!(config.get_str(API_KEY), Some(" "));
    }

    #[test]
    fn default_config_has_no_api_key() {
        assert!(!DEFAULT_CONFIG.contains_key(API_KEY));
        let _ = instance_config(Some("bar")).expect("valid key");
        assert!(!DEFAULT_CONFIG.contains_key(API_KEY));
    }

    #[test]
    fn default_app_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("FT_API_KEY"));
        assert!(toml_str.contains("timeout_secs"));
    }

    #[test]
    fn app_config_with_overrides() {
        let toml_str = r#"
[api]
timeout_secs = 3

[overrides]
pagePath = "http://localhost:8080/pages/"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.api.api_key_env, "FT_API_KEY");
        assert_eq!(
            config.overrides.get_str(PAGE_PATH),
            Some("http://localhost:8080/pages/")
        );
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!(
            "ftapi-test-invalid-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api\ntimeout_secs = ").expect("write fixture");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn explicit_api_key_wins() {
        let mut config = AppConfig::default();
        config.api.api_key_env = "FTAPI_TEST_NONEXISTENT_KEY_12345".into();
        assert_eq!(resolve_api_key(Some("abc"), &config).unwrap(), "abc");
        assert_eq!(resolve_api_key(Some(" abc "), &config).unwrap(), " abc ");

        let err = resolve_api_key(None, &config).unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }
}
