//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::ShipstackConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored file cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<ShipstackConfig> {
    store.load()
}

/// Validate and persist one `key = value` change. Returns the new config.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or saving fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ShipstackConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
