//! API Error Types

use thiserror::Error;

use flex_activation::ActivationError;
use flex_authz::AuthzError;
use flex_store::StoreError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API-level errors; lower layers pass through with their own rendering
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unresolvable asset type or operation token
    #[error("No such operation: {call}")]
    NoSuchOperation { call: String },

    /// Malformed arguments or caller context
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authorization denial or propagated store failure
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Existence violation or store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Store failure surfaced by the activation aggregation
    #[error(transparent)]
    Activation(#[from] ActivationError),
}

impl ApiError {
    pub fn no_such_operation(handler: &str, operation: &str) -> Self {
        Self::NoSuchOperation {
            call: format!("{}.{}", handler, operation),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}
