//! Application settings loaded from config.toml
//!
//! The settings file is optional: when it is absent the defaults below apply. A file
//! that exists but cannot be read or parsed is a configuration error.

use crate::{
    core::order::DEFAULT_DISPATCH_BASE_URL,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Default location of the menu data file.
pub const DEFAULT_CATALOG_PATH: &str = "data/menu.json";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path of the JSON menu file loaded at startup
    pub catalog_path: PathBuf,
    /// Base of the messaging deep-link orders are sent through
    pub dispatch_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            dispatch_base_url: DEFAULT_DISPATCH_BASE_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Parses and checks the dispatch base URL.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the URL is malformed or cannot carry a path.
    pub fn dispatch_url(&self) -> Result<Url> {
        let url = Url::parse(&self.dispatch_base_url).map_err(|e| {
            Error::config(format!(
                "Invalid dispatch_base_url '{}': {e}",
                self.dispatch_base_url
            ))
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "dispatch_base_url '{}' cannot carry a phone number path",
                self.dispatch_base_url
            )));
        }
        Ok(url)
    }
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The file contains unknown keys
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref)
        .map_err(|e| Error::config(format!("Failed to read config file {path_ref:?}: {e}")))?;

    toml::from_str(&contents)
        .map_err(|e| Error::config(format!("Failed to parse config file {path_ref:?}: {e}")))
}

/// Like [`load_config`], but a missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::info!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }
    load_config(path_ref)
}
