//! Custom error types for the expense tracker
//!
//! Two kinds of failure matter to callers of the session layer: an operation
//! attempted without a signed-in user, and a failure reported by the document
//! store. The remaining variants cover configuration and file handling.

use thiserror::Error;

/// The main error type for expense tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A mutating operation was attempted with no authenticated user
    #[error("Authentication required: sign in first")]
    AuthenticationRequired,

    /// Any failure reported by the document store
    #[error("Store operation failed: {0}")]
    Store(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input that cannot be coerced
    #[error("Validation error: {0}")]
    Validation(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl TrackerError {
    /// Wrap a store failure, keeping the underlying message
    pub fn store(cause: impl std::fmt::Display) -> Self {
        Self::Store(cause.to_string())
    }

    /// Check if this is an authentication error
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    /// Check if this is a store failure
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for expense tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
