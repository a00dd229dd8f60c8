//! Loads and validates the proxy's YAML configuration file.

use std::path::Path;

use crate::models::config::Configuration;
use crate::models::error::ConfigError;

/// Reads the config file at `path`, deserializes it as YAML, and validates
/// the result. Returns a [`ConfigError`] rather than panicking on any
/// failure, so the caller can log a diagnostic and exit with code 1.
pub fn load_config(path: &Path) -> Result<Configuration, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let config: Configuration =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    config.validate()?;

    Ok(config)
}
