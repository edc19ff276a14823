//! Asset Kind Registry
//!
//! Every persisted document carries an `assetType` discriminator used to
//! scope rich queries; all asset ids share one key space on the ledger.

use serde::{Deserialize, Serialize};

/// Field injected by the store layer into every persisted document
pub const ASSET_TYPE_FIELD: &str = "assetType";

/// Discriminator for the persisted asset collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Site,
    Aggregator,
    Endpoint,
    MeteringRecordHv,
    MeteringRecordMv,
    Bid,
    Schedule,
    OrderBySite,
}

impl AssetKind {
    /// The `assetType` tag stored with each document of this kind
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Aggregator => "aggregator",
            Self::Endpoint => "endpoint",
            Self::MeteringRecordHv => "meteringRecordHV",
            Self::MeteringRecordMv => "meteringRecordMV",
            Self::Bid => "bid",
            Self::Schedule => "schedule",
            Self::OrderBySite => "orderBySiteActivationDocument",
        }
    }

    /// Handler name used in dispatch tokens and error envelopes
    pub fn handler_name(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Aggregator => "Aggregator",
            Self::Endpoint => "Endpoint",
            Self::MeteringRecordHv => "MeteringRecordHV",
            Self::MeteringRecordMv => "MeteringRecordMV",
            Self::Bid => "Bid",
            Self::Schedule => "Schedule",
            Self::OrderBySite => "OrderBySiteActivationDocument",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.handler_name())
    }
}

/// A document persisted on the ledger under its unique id
pub trait LedgerAsset {
    /// Unique id, also the ledger key
    fn asset_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct() {
        let kinds = [
            AssetKind::Site,
            AssetKind::Aggregator,
            AssetKind::Endpoint,
            AssetKind::MeteringRecordHv,
            AssetKind::MeteringRecordMv,
            AssetKind::Bid,
            AssetKind::Schedule,
            AssetKind::OrderBySite,
        ];
        let mut tags: Vec<_> = kinds.iter().map(|k| k.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), kinds.len());
    }
}
