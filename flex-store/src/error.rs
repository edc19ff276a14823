//! Store Error Types

use thiserror::Error;

/// Store Result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Create precondition violated: the id is already registered
    #[error("{id} already exists.")]
    AlreadyExists { id: String },

    /// Update/get precondition violated: the id is not registered
    #[error("{id} does not exist.")]
    NotFound { id: String },

    /// Document (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backing store itself failed
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Invalid store configuration
    #[error("Store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Create an already-exists error
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    /// Create a not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
