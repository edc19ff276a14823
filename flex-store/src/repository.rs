//! Typed Asset Repository
//!
//! Thin typed wrapper over [`AssetStore`] used by every asset-type
//! handler. Enforces the existence preconditions (create-if-absent,
//! update-if-exists) on the shared key space; the `assetType` tag is
//! injected by the store and never seen by callers.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use flex_core::{AssetKind, LedgerAsset, Selector};

use crate::error::{StoreError, StoreResult};
use crate::store::AssetStore;

/// Typed repository over the asset store
#[derive(Clone)]
pub struct AssetRepository {
    store: Arc<dyn AssetStore>,
}

impl AssetRepository {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    /// Register a new asset; fails if its id is already taken by any
    /// asset of any kind (ids share one key space).
    pub async fn create<T: LedgerAsset + Serialize>(
        &self,
        kind: AssetKind,
        asset: &T,
    ) -> StoreResult<()> {
        let id = asset.asset_id();
        if self.store.exists(id).await? {
            return Err(StoreError::already_exists(id));
        }
        let value = serde_json::to_value(asset)?;
        self.store.put(id, kind.tag(), value).await?;
        debug!(asset_id = %id, asset_type = %kind.tag(), "asset created");
        Ok(())
    }

    /// Replace an existing asset; fails if its id is not registered.
    pub async fn update<T: LedgerAsset + Serialize>(
        &self,
        kind: AssetKind,
        asset: &T,
    ) -> StoreResult<()> {
        let id = asset.asset_id();
        if !self.store.exists(id).await? {
            return Err(StoreError::not_found(id));
        }
        let value = serde_json::to_value(asset)?;
        self.store.put(id, kind.tag(), value).await?;
        debug!(asset_id = %id, asset_type = %kind.tag(), "asset updated");
        Ok(())
    }

    /// Fetch and deserialize; absent id is an error.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> StoreResult<T> {
        match self.try_get(id).await? {
            Some(asset) => Ok(asset),
            None => Err(StoreError::not_found(id)),
        }
    }

    /// Fetch and deserialize; absent id is `None`.
    pub async fn try_get<T: DeserializeOwned>(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetch the raw JSON document, used by ownership-chain walking
    pub async fn get_raw(&self, id: &str) -> StoreResult<Option<Value>> {
        self.store.get(id).await
    }

    pub async fn exists(&self, id: &str) -> StoreResult<bool> {
        self.store.exists(id).await
    }

    /// Selector query over one collection, deserialized
    pub async fn query<T: DeserializeOwned>(
        &self,
        kind: AssetKind,
        selector: &Selector,
    ) -> StoreResult<Vec<T>> {
        let docs = self.store.query(kind.tag(), selector).await?;
        let mut assets = Vec::with_capacity(docs.len());
        for doc in docs {
            assets.push(serde_json::from_value(doc)?);
        }
        Ok(assets)
    }

    /// Selector query over one collection, raw documents
    pub async fn query_raw(&self, kind: AssetKind, selector: &Selector) -> StoreResult<Vec<Value>> {
        self.store.query(kind.tag(), selector).await
    }

    /// Create each asset in order; fails fast on the first taken id.
    /// Items persisted before the failure stay persisted - rolling back
    /// is the surrounding ledger transaction's concern.
    pub async fn create_bulk<T: LedgerAsset + Serialize>(
        &self,
        kind: AssetKind,
        assets: &[T],
    ) -> StoreResult<()> {
        for asset in assets {
            self.create(kind, asset).await?;
        }
        Ok(())
    }

    /// Update each asset in order; fails fast on the first missing id.
    pub async fn update_bulk<T: LedgerAsset + Serialize>(
        &self,
        kind: AssetKind,
        assets: &[T],
    ) -> StoreResult<()> {
        for asset in assets {
            self.update(kind, asset).await?;
        }
        Ok(())
    }
}
