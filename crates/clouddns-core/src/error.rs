//! Error types for clouddns
//!
//! The reconciler branches on exactly one condition, [`Error::NotFound`].
//! Every other variant is carried back to the caller untouched.

use thiserror::Error;

/// Result type alias for clouddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for clouddns
#[derive(Error, Debug)]
pub enum Error {
    /// No record with the requested key and type exists in the zone
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Any other backend failure (auth, network, quota, conflict, malformed zone)
    #[error("Backend error ({backend}): {message}")]
    Backend {
        /// Backend name
        backend: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a backend error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is the "record absent" sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
