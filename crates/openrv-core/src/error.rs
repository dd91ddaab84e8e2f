//! Error types for the OpenRV session engine.

use thiserror::Error;

/// Main error type for session operations.
///
/// Every variant is handled inside the engine; the renderer only ever sees
/// fully committed state.
#[derive(Error, Debug)]
pub enum RvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Session closed")]
    SessionClosed,
}

impl RvError {
    /// Shorthand for an [`RvError::InvalidParameter`] with a formatted message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, RvError>;
