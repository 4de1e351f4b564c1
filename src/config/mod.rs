/// Environment-variable overrides
pub mod env;

/// Application settings from config.toml
pub mod settings;

pub use settings::AppConfig;

use crate::errors::Result;
use tracing::info;

/// Loads settings from the configured file (or defaults) and applies environment
/// overrides on top.
///
/// # Errors
/// Returns [`crate::errors::Error::Config`] if a settings file exists but is invalid.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::get_config_path();
    let config = env::apply_env_overrides(settings::load_config_or_default(&path)?);
    info!(
        "Configuration: catalog at {:?}, dispatch via {}",
        config.catalog_path, config.dispatch_base_url
    );
    Ok(config)
}
