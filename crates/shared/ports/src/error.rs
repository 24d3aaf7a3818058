use thiserror::Error;

/// Errors reported by a venue client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VenueError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(String),
}

pub type VenueResult<T> = std::result::Result<T, VenueError>;
