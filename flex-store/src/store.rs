//! Asset Store Trait
//!
//! The ledger world-state seen by this core: point get/put/exists on a
//! shared key space plus a selector query scoped by the `assetType` tag.
//! Each call is assumed atomic and externally consistent; transaction
//! boundaries belong to the surrounding platform.

use async_trait::async_trait;
use serde_json::Value;

use flex_core::Selector;

/// Key-value world state with rich queries
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Read the document stored under `key`
    async fn get(&self, key: &str) -> crate::StoreResult<Option<Value>>;

    /// Write `value` under `key`, overwriting any previous document.
    /// `asset_type` is recorded as the document's discriminator tag.
    async fn put(&self, key: &str, asset_type: &str, value: Value) -> crate::StoreResult<()>;

    /// Whether a document is stored under `key`
    async fn exists(&self, key: &str) -> crate::StoreResult<bool>;

    /// All documents whose `assetType` equals `asset_type` and which
    /// match `selector`. Result order is unspecified.
    async fn query(&self, asset_type: &str, selector: &Selector) -> crate::StoreResult<Vec<Value>>;
}
