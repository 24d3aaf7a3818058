//! Orchestrator configuration
//!
//! Loaded from JSON; every field has a default so an empty object is valid.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Keep configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeepConfig {
    /// Capacity of the venue event queue
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Log events whose venue is not attached to this keep
    #[serde(default = "default_true")]
    pub log_unknown_venues: bool,
}

fn default_event_buffer() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            event_buffer: default_event_buffer(),
            log_unknown_venues: default_true(),
        }
    }
}

impl KeepConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid(
                "event_buffer must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load keep configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<KeepConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load keep configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<KeepConfig, ConfigError> {
    let config: KeepConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
