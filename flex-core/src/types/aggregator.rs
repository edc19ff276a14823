//! Aggregator (EDA) Registry Asset

use serde::{Deserialize, Serialize};

use super::LedgerAsset;

/// Aggregator asset - groups sites under one Balancing Service Provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregator {
    /// Unique EDA registry id, also the ledger key
    pub eda_registered_resource_id: String,
    /// Owning BSP identity
    pub a46_name: String,
    /// Display name
    pub eda_name: String,
}

impl LedgerAsset for Aggregator {
    fn asset_id(&self) -> &str {
        &self.eda_registered_resource_id
    }
}
