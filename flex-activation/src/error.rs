//! Activation Error Types

use thiserror::Error;

use flex_store::StoreError;

/// Activation Result type
pub type ActivationResult<T> = Result<T, ActivationError>;

/// Activation Error
///
/// The aggregation path degrades instead of failing; the only errors it
/// surfaces are store failures from the collections it joins.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
