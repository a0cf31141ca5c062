// Path: crates/host/src/config.rs
//! Loading and validating store configuration files.

use pagevault_types::config::StoreConfig;
use std::path::Path;
use thiserror::Error;

/// Failures while loading a store configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for a `StoreConfig`.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The file parsed but its contents are unusable.
    #[error("{0}")]
    Invalid(String),
}

/// Reads, parses and validates a `StoreConfig` from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig, ConfigError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: StoreConfig = toml::from_str(&raw)?;
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}
