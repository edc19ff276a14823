//! Ownership Chains
//!
//! A chain describes how to get from one document to the organization
//! that owns it: zero or more reference hops (read a field, fetch the
//! document it names) followed by one owner-field read on the final
//! document. Chains are walked with sequential point reads and no
//! caching - the ledger's query language has no joins, so callers that
//! need to test a whole collection against an owner fetch the collection
//! and scan in memory instead.

use serde_json::Value;
use tracing::debug;

use flex_core::{AssetKind, ASSET_TYPE_FIELD};
use flex_store::{AssetRepository, StoreResult};

/// One reference hop: read `ref_field`, fetch the named document and
/// require it to be tagged as `kind`.
#[derive(Debug, Clone, Copy)]
pub struct Hop {
    pub ref_field: &'static str,
    pub kind: AssetKind,
}

/// A full ownership chain ending in an owner-field read
#[derive(Debug, Clone)]
pub struct Chain {
    hops: Vec<Hop>,
    owner_field: &'static str,
}

impl Chain {
    pub fn new(hops: Vec<Hop>, owner_field: &'static str) -> Self {
        Self { hops, owner_field }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn owner_field(&self) -> &'static str {
        self.owner_field
    }

    // ==================== Well-known chains ====================

    /// Site → owning DSO
    pub fn site_to_dso() -> Self {
        Self::new(vec![], "a04RegisteredResourceMrid")
    }

    /// Site → owning producer
    pub fn site_to_producer() -> Self {
        Self::new(vec![], "producerMrid")
    }

    /// Site → Aggregator → owning BSP
    pub fn site_to_bsp() -> Self {
        Self::new(
            vec![Hop {
                ref_field: "edaRegisteredResourceId",
                kind: AssetKind::Aggregator,
            }],
            "a46Name",
        )
    }

    /// Bid → Aggregator → owning BSP
    pub fn bid_to_bsp() -> Self {
        Self::site_to_bsp()
    }

    /// MeteringRecord → Site → owning DSO
    pub fn metering_to_dso() -> Self {
        Self::new(
            vec![Hop {
                ref_field: "siteId",
                kind: AssetKind::Site,
            }],
            "a04RegisteredResourceMrid",
        )
    }

    /// MeteringRecord → Site → owning producer
    pub fn metering_to_producer() -> Self {
        Self::new(
            vec![Hop {
                ref_field: "siteId",
                kind: AssetKind::Site,
            }],
            "producerMrid",
        )
    }

    /// MeteringRecord → Site → Aggregator → owning BSP
    pub fn metering_to_bsp() -> Self {
        Self::new(
            vec![
                Hop {
                    ref_field: "siteId",
                    kind: AssetKind::Site,
                },
                Hop {
                    ref_field: "edaRegisteredResourceId",
                    kind: AssetKind::Aggregator,
                },
            ],
            "a46Name",
        )
    }

    /// Endpoint → Site → owning DSO
    pub fn endpoint_to_dso() -> Self {
        Self::metering_to_dso()
    }

    /// Endpoint → Site → owning producer
    pub fn endpoint_to_producer() -> Self {
        Self::metering_to_producer()
    }

    /// Endpoint → Site → Aggregator → owning BSP
    pub fn endpoint_to_bsp() -> Self {
        Self::metering_to_bsp()
    }

    /// Schedule → Endpoint → Site → owning DSO
    pub fn schedule_to_dso() -> Self {
        Self::new(
            vec![
                Hop {
                    ref_field: "edpRegisteredResourceId",
                    kind: AssetKind::Endpoint,
                },
                Hop {
                    ref_field: "siteId",
                    kind: AssetKind::Site,
                },
            ],
            "a04RegisteredResourceMrid",
        )
    }

    /// Schedule → Endpoint → Site → Aggregator → owning BSP
    pub fn schedule_to_bsp() -> Self {
        Self::new(
            vec![
                Hop {
                    ref_field: "edpRegisteredResourceId",
                    kind: AssetKind::Endpoint,
                },
                Hop {
                    ref_field: "siteId",
                    kind: AssetKind::Site,
                },
                Hop {
                    ref_field: "edaRegisteredResourceId",
                    kind: AssetKind::Aggregator,
                },
            ],
            "a46Name",
        )
    }

    /// Order → Site → owning DSO
    pub fn order_to_dso() -> Self {
        Self::metering_to_dso()
    }

    /// Order → Site → owning producer
    pub fn order_to_producer() -> Self {
        Self::metering_to_producer()
    }

    /// Order → Site → Aggregator → owning BSP
    pub fn order_to_bsp() -> Self {
        Self::metering_to_bsp()
    }
}

/// Walks ownership chains with sequential point reads
#[derive(Clone)]
pub struct OwnershipResolver {
    repository: AssetRepository,
}

impl OwnershipResolver {
    pub fn new(repository: AssetRepository) -> Self {
        Self { repository }
    }

    /// Resolve the organization id at the end of `chain`, starting from
    /// an already-fetched document.
    ///
    /// Any missing hop - an absent or empty reference field, a document
    /// that is not stored, a document stored under a different type tag,
    /// an absent owner field - resolves to `Ok(None)`. Only store I/O
    /// failures are errors.
    pub async fn resolve(&self, asset: &Value, chain: &Chain) -> StoreResult<Option<String>> {
        let mut current = asset.clone();
        for hop in chain.hops() {
            let Some(next_id) = non_empty_str(&current, hop.ref_field) else {
                debug!(field = hop.ref_field, "chain hop field missing");
                return Ok(None);
            };
            let Some(doc) = self.repository.get_raw(&next_id).await? else {
                debug!(asset_id = %next_id, "chain hop target missing");
                return Ok(None);
            };
            if doc.get(ASSET_TYPE_FIELD).and_then(Value::as_str) != Some(hop.kind.tag()) {
                debug!(asset_id = %next_id, expected = hop.kind.tag(), "chain hop target mistagged");
                return Ok(None);
            }
            current = doc;
        }
        Ok(non_empty_str(&current, chain.owner_field()))
    }

    /// Whether `chain` resolves to `organization_id`
    pub async fn has_ownership(
        &self,
        asset: &Value,
        chain: &Chain,
        organization_id: &str,
    ) -> StoreResult<bool> {
        Ok(self.resolve(asset, chain).await?.as_deref() == Some(organization_id))
    }
}

fn non_empty_str(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use flex_core::{Aggregator, Bid, Site, VoltageType};
    use flex_store::MemoryAssetStore;

    fn fixtures() -> (AssetRepository, OwnershipResolver) {
        let repo = AssetRepository::new(Arc::new(MemoryAssetStore::new()));
        (repo.clone(), OwnershipResolver::new(repo))
    }

    fn site(id: &str, eda: &str) -> Site {
        Site {
            site_id: id.to_string(),
            voltage_type: VoltageType::MV,
            a04_registered_resource_mrid: "dso-a".to_string(),
            producer_mrid: "prod-a".to_string(),
            eda_registered_resource_id: eda.to_string(),
            metering_point_mrid: "MP-1".to_string(),
        }
    }

    fn aggregator(id: &str, bsp: &str) -> Aggregator {
        Aggregator {
            eda_registered_resource_id: id.to_string(),
            a46_name: bsp.to_string(),
            eda_name: "EDA One".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolves_through_intermediate_asset() {
        let (repo, resolver) = fixtures();
        repo.create(AssetKind::Site, &site("S1", "eda-1")).await.unwrap();
        repo.create(AssetKind::Aggregator, &aggregator("eda-1", "bsp-x"))
            .await
            .unwrap();

        let site_doc = repo.get_raw("S1").await.unwrap().unwrap();
        let owner = resolver.resolve(&site_doc, &Chain::site_to_bsp()).await.unwrap();
        assert_eq!(owner.as_deref(), Some("bsp-x"));
        assert!(resolver
            .has_ownership(&site_doc, &Chain::site_to_bsp(), "bsp-x")
            .await
            .unwrap());
        assert!(!resolver
            .has_ownership(&site_doc, &Chain::site_to_bsp(), "bsp-y")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_missing_link_resolves_to_none() {
        let (repo, resolver) = fixtures();
        // Site references an aggregator that was never registered.
        repo.create(AssetKind::Site, &site("S1", "eda-ghost")).await.unwrap();

        let site_doc = repo.get_raw("S1").await.unwrap().unwrap();
        let owner = resolver.resolve(&site_doc, &Chain::site_to_bsp()).await.unwrap();
        assert_eq!(owner, None);
    }

    #[tokio::test]
    async fn test_mistagged_target_resolves_to_none() {
        let (repo, resolver) = fixtures();
        // The referenced id exists but is a Bid, not an Aggregator.
        repo.create(AssetKind::Site, &site("S1", "bid-1")).await.unwrap();
        let bid = Bid {
            bid_id: "bid-1".to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            registered_resource_mrid: "rr-1".to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "10".to_string(),
            points: vec![],
        };
        repo.create(AssetKind::Bid, &bid).await.unwrap();

        let site_doc = repo.get_raw("S1").await.unwrap().unwrap();
        let owner = resolver.resolve(&site_doc, &Chain::site_to_bsp()).await.unwrap();
        assert_eq!(owner, None);
    }

    #[tokio::test]
    async fn test_direct_owner_field() {
        let (repo, resolver) = fixtures();
        repo.create(AssetKind::Site, &site("S1", "eda-1")).await.unwrap();

        let site_doc = repo.get_raw("S1").await.unwrap().unwrap();
        let owner = resolver.resolve(&site_doc, &Chain::site_to_dso()).await.unwrap();
        assert_eq!(owner.as_deref(), Some("dso-a"));
    }

    #[tokio::test]
    async fn test_three_hop_schedule_chain() {
        let (repo, resolver) = fixtures();
        repo.create(AssetKind::Site, &site("S1", "eda-1")).await.unwrap();
        repo.create(AssetKind::Aggregator, &aggregator("eda-1", "bsp-x"))
            .await
            .unwrap();
        let endpoint = flex_core::Endpoint {
            edp_registered_resource_id: "edp-1".to_string(),
            site_id: "S1".to_string(),
            edp_name: "EDP One".to_string(),
        };
        repo.create(AssetKind::Endpoint, &endpoint).await.unwrap();

        let schedule = serde_json::json!({"edpRegisteredResourceId": "edp-1"});
        let owner = resolver.resolve(&schedule, &Chain::schedule_to_bsp()).await.unwrap();
        assert_eq!(owner.as_deref(), Some("bsp-x"));
    }
}
