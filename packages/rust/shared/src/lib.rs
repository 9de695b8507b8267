//! Shared types, error model, and configuration for the FT API client.
//!
//! This crate is the foundation depended on by the other workspace crates.
//! It provides:
//! - [`FtApiError`] — the unified error type
//! - [`Config`] layers and the immutable [`DEFAULT_CONFIG`]
//! - The user config file ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    API_ITEM_PATH, API_KEY, ApiConfig, AppConfig, DEFAULT_CONFIG, PAGE_MAIN_CONTENT, PAGE_PATH,
    config_dir, config_file_path, init_config, instance_config, load_config, load_config_from,
    resolve_api_key,
};
pub use error::{FtApiError, Result};
pub use types::{Config, ConfigValue};
