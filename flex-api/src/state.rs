//! Shared Handler State

use std::sync::Arc;

use flex_activation::ActivationAggregator;
use flex_authz::AuthorizationResolver;
use flex_store::{AssetRepository, AssetStore, MemoryAssetStore, StoreConfig, StoreResult};

/// State shared by every asset handler
#[derive(Clone)]
pub struct AppState {
    pub repository: AssetRepository,
    pub authz: AuthorizationResolver,
    pub activations: ActivationAggregator,
}

impl AppState {
    /// Build the state over an already-opened store
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        let repository = AssetRepository::new(store);
        let authz = AuthorizationResolver::new(repository.clone());
        let activations = ActivationAggregator::new(repository.clone());
        Self {
            repository,
            authz,
            activations,
        }
    }

    /// Open the configured backend and build the state over it
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        Ok(Self::new(config.open()?))
    }

    /// In-memory state for tests
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryAssetStore::new()))
    }
}
