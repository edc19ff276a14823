//! Authorization Error Types

use thiserror::Error;

use flex_store::StoreError;

/// Authorization Result type
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Authorization Error
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The caller's role or ownership failed a policy predicate.
    /// Rendered exactly as the platform's response envelope expects.
    #[error("{handler} resulted in an Error for {asset_id}. Reason: {cause}")]
    Denied {
        handler: String,
        asset_id: String,
        cause: String,
    },

    /// The underlying store call itself failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthzError {
    /// Create a denial for one asset and operation
    pub fn denied(
        handler: impl Into<String>,
        asset_id: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self::Denied {
            handler: handler.into(),
            asset_id: asset_id.into(),
            cause: cause.into(),
        }
    }
}
