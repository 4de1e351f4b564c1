//! Environment-variable overrides for the application settings.
//!
//! Values are read through a lookup function so the override logic can be exercised
//! without touching the process environment.

use super::settings::AppConfig;
use std::path::PathBuf;

/// Location of the settings file.
pub const CONFIG_PATH_VAR: &str = "MENU_CONFIG_PATH";
/// Overrides `catalog_path`.
pub const CATALOG_PATH_VAR: &str = "MENU_CATALOG_PATH";
/// Overrides `dispatch_base_url`.
pub const DISPATCH_URL_VAR: &str = "MENU_DISPATCH_URL";

/// Gets the settings file path from `MENU_CONFIG_PATH`, falling back to `./config.toml`.
#[must_use]
pub fn get_config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_VAR).map_or_else(|_| PathBuf::from("config.toml"), PathBuf::from)
}

/// Applies overrides found by `lookup` on top of `config`. Blank values are ignored.
#[must_use]
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = non_blank(CATALOG_PATH_VAR) {
        tracing::debug!("{} overrides catalog path: {}", CATALOG_PATH_VAR, path);
        config.catalog_path = PathBuf::from(path);
    }
    if let Some(url) = non_blank(DISPATCH_URL_VAR) {
        tracing::debug!("{} overrides dispatch URL: {}", DISPATCH_URL_VAR, url);
        config.dispatch_base_url = url;
    }
    config
}

/// Applies overrides from the process environment.
#[must_use]
pub fn apply_env_overrides(config: AppConfig) -> AppConfig {
    apply_overrides(config, |key| std::env::var(key).ok())
}
