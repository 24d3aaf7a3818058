//! Error types for the orchestrator

use crate::config::ConfigError;
use dola_ports::VenueError;
use thiserror::Error;

/// Errors returned by strategy callbacks and tick handlers
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Interval must be greater than zero")]
    InvalidInterval,

    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("Strategy failed: {0}")]
    Failed(String),
}

impl StrategyError {
    /// Shorthand for [`StrategyError::Failed`]
    pub fn failed(msg: impl Into<String>) -> Self {
        StrategyError::Failed(msg.into())
    }
}

pub type StrategyResult<T> = std::result::Result<T, StrategyError>;

/// Orchestrator configuration and lifecycle errors
#[derive(Error, Debug)]
pub enum KeepError {
    #[error("Name already registered in this node: {0}")]
    DuplicateName(String),

    #[error("Invalid strategy name: {0:?}")]
    InvalidName(String),

    #[error("Venue already registered: {0}")]
    DuplicateVenue(String),

    #[error("Keep is already running")]
    AlreadyRunning,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, KeepError>;
