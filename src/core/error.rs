//! Error types for tierwatch.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for tierwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tierwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Invalid configuration for {scope}: {reason}")]
    InvalidConfiguration { scope: String, reason: String },

    #[error("Unknown SLA tier: {0}")]
    UnknownTier(String),

    // Lifecycle errors
    #[error("Tracker already running")]
    AlreadyRunning,

    #[error("No tokio runtime available: {0}")]
    RuntimeUnavailable(String),

    #[error("Recompute task did not stop within {duration:?}")]
    StopTimeout { duration: Duration },

    #[error("Recompute task join failed: {0}")]
    TaskJoinFailed(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn invalid_config(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            scope: scope.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoinFailed(err.to_string())
    }
}
