//! Access Policies
//!
//! Per-asset-type policy tables keyed by operation and caller role. Each
//! table entry is one of: always allow, always deny, conditional on an
//! ownership chain, or conditional on the referenced site's voltage
//! class. The per-asset rules live in one file per asset family, composed
//! from the shared capability checks below.
//!
//! List operations apply the same per-item read predicate as a
//! post-filter over the fetched collection - the ledger's query language
//! cannot express ownership, so filtering always happens after the fetch.
//! The TSO is exempt (full visibility); a role with no legitimate
//! interest in a type receives an empty list, never an error.

mod bid;
mod metering;
mod order;
mod registry;
mod schedule;
mod site;

use serde_json::Value;
use tracing::debug;

use flex_core::{AssetKind, Organization, OrganizationRole};
use flex_store::{AssetRepository, StoreResult};

use crate::chain::{Chain, OwnershipResolver};
use crate::decision::Decision;
use crate::error::{AuthzError, AuthzResult};

/// Gated operations on a single asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Read,
    /// Append one entry to an order's lifecycle log
    AppendLog,
}

impl Operation {
    /// Verb used in denial causes
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update | Self::AppendLog => "update",
            Self::Read => "read",
        }
    }
}

/// Per-asset-type, per-operation, per-role authorization
#[derive(Clone)]
pub struct AuthorizationResolver {
    pub(crate) repository: AssetRepository,
    pub(crate) ownership: OwnershipResolver,
}

impl AuthorizationResolver {
    pub fn new(repository: AssetRepository) -> Self {
        let ownership = OwnershipResolver::new(repository.clone());
        Self {
            repository,
            ownership,
        }
    }

    pub fn ownership(&self) -> &OwnershipResolver {
        &self.ownership
    }

    /// May `caller` create an asset of `kind` with this payload?
    pub async fn can_create(
        &self,
        kind: AssetKind,
        caller: &Organization,
        payload: &Value,
    ) -> StoreResult<Decision> {
        let decision = match kind {
            AssetKind::Site => site::can_create(self, caller, payload).await?,
            AssetKind::Aggregator | AssetKind::Endpoint => {
                registry::can_create(kind, caller)
            }
            AssetKind::MeteringRecordHv | AssetKind::MeteringRecordMv => {
                metering::can_create(self, kind, caller, payload).await?
            }
            AssetKind::Bid => bid::can_create(self, caller, payload).await?,
            AssetKind::Schedule => schedule::can_create(self, caller, payload).await?,
            AssetKind::OrderBySite => order::can_create(self, caller, payload).await?,
        };
        if !decision.is_allowed() {
            debug!(
                asset_type = kind.tag(),
                role = %caller.role,
                cause = decision.cause(),
                "create denied"
            );
        }
        Ok(decision)
    }

    /// May `caller` perform `op` on this stored asset?
    pub async fn can_act(
        &self,
        kind: AssetKind,
        op: Operation,
        caller: &Organization,
        asset: &Value,
    ) -> StoreResult<Decision> {
        let decision = match kind {
            AssetKind::Site => site::can_act(self, op, caller, asset).await?,
            AssetKind::Aggregator | AssetKind::Endpoint => {
                registry::can_act(self, kind, op, caller, asset).await?
            }
            AssetKind::MeteringRecordHv | AssetKind::MeteringRecordMv => {
                metering::can_act(self, kind, op, caller, asset).await?
            }
            AssetKind::Bid => bid::can_act(self, op, caller, asset).await?,
            AssetKind::Schedule => schedule::can_act(self, op, caller, asset).await?,
            AssetKind::OrderBySite => order::can_act(self, op, caller, asset).await?,
        };
        if !decision.is_allowed() {
            debug!(
                asset_type = kind.tag(),
                operation = op.verb(),
                role = %caller.role,
                cause = decision.cause(),
                "operation denied"
            );
        }
        Ok(decision)
    }

    /// `can_create`, mapped into the denial error carrying handler name,
    /// asset id and cause.
    pub async fn ensure_create(
        &self,
        kind: AssetKind,
        caller: &Organization,
        asset_id: &str,
        payload: &Value,
    ) -> AuthzResult<()> {
        let decision = self.can_create(kind, caller, payload).await?;
        if decision.is_allowed() {
            Ok(())
        } else {
            Err(AuthzError::denied(kind.handler_name(), asset_id, decision.cause()))
        }
    }

    /// `can_act`, mapped into the denial error
    pub async fn ensure(
        &self,
        kind: AssetKind,
        op: Operation,
        caller: &Organization,
        asset_id: &str,
        asset: &Value,
    ) -> AuthzResult<()> {
        let decision = self.can_act(kind, op, caller, asset).await?;
        if decision.is_allowed() {
            Ok(())
        } else {
            Err(AuthzError::denied(kind.handler_name(), asset_id, decision.cause()))
        }
    }

    /// Post-filter a fetched collection down to the items `caller` may
    /// read. Denied items are silently omitted; only store failures
    /// abort.
    pub async fn filter_visible(
        &self,
        kind: AssetKind,
        caller: &Organization,
        documents: Vec<Value>,
    ) -> StoreResult<Vec<Value>> {
        if caller.role == OrganizationRole::Tso {
            return Ok(documents);
        }
        let mut visible = Vec::with_capacity(documents.len());
        let total = documents.len();
        for doc in documents {
            let decision = self.can_act(kind, Operation::Read, caller, &doc).await?;
            if decision.is_allowed() {
                visible.push(doc);
            }
        }
        debug!(
            asset_type = kind.tag(),
            role = %caller.role,
            total,
            count = visible.len(),
            "list post-filtered"
        );
        Ok(visible)
    }
}

// ==================== Shared capability checks ====================

/// Short label used in denial causes
pub(crate) fn policy_noun(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Site => "Site",
        AssetKind::Aggregator => "Aggregator",
        AssetKind::Endpoint => "Endpoint",
        AssetKind::MeteringRecordHv => "HV",
        AssetKind::MeteringRecordMv => "MV",
        AssetKind::Bid => "Bid",
        AssetKind::Schedule => "Schedule",
        AssetKind::OrderBySite => "Order",
    }
}

pub(crate) fn role_denied(op: Operation, kind: AssetKind) -> Decision {
    Decision::deny(format!(
        "OrganizationType is not allowed to {} {}.",
        op.verb(),
        policy_noun(kind)
    ))
}

pub(crate) fn voltage_denied(op: Operation, kind: AssetKind, voltage: &str) -> Decision {
    Decision::deny(format!(
        "OrganizationType is not allowed to {} {} for voltage type {}.",
        op.verb(),
        policy_noun(kind),
        voltage
    ))
}

pub(crate) fn ownership_denied(caller: &Organization, asset_id: &str) -> Decision {
    Decision::deny(format!(
        "Organization {} has no ownership of {}.",
        caller.organization_id, asset_id
    ))
}

/// Ownership check yielding a decision; an unresolvable chain denies.
pub(crate) async fn owned_or_denied(
    resolver: &AuthorizationResolver,
    asset: &Value,
    chain: &Chain,
    caller: &Organization,
    asset_id: &str,
) -> StoreResult<Decision> {
    if resolver
        .ownership
        .has_ownership(asset, chain, &caller.organization_id)
        .await?
    {
        Ok(Decision::allow())
    } else {
        Ok(ownership_denied(caller, asset_id))
    }
}

/// String field of a JSON document, empty when absent
pub(crate) fn doc_str<'a>(doc: &'a Value, field: &str) -> &'a str {
    doc.get(field).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use flex_core::{
        Aggregator, Bid, MeteringRecord, Point, Site, VoltageType,
    };
    use flex_store::MemoryAssetStore;

    struct World {
        repo: AssetRepository,
        authz: AuthorizationResolver,
    }

    impl World {
        fn new() -> Self {
            let repo = AssetRepository::new(Arc::new(MemoryAssetStore::new()));
            let authz = AuthorizationResolver::new(repo.clone());
            Self { repo, authz }
        }

        async fn seed_site(&self, id: &str, voltage: VoltageType, dso: &str, producer: &str, eda: &str) {
            let site = Site {
                site_id: id.to_string(),
                voltage_type: voltage,
                a04_registered_resource_mrid: dso.to_string(),
                producer_mrid: producer.to_string(),
                eda_registered_resource_id: eda.to_string(),
                metering_point_mrid: format!("MP-{}", id),
            };
            self.repo.create(AssetKind::Site, &site).await.unwrap();
        }

        async fn seed_aggregator(&self, id: &str, bsp: &str) {
            let eda = Aggregator {
                eda_registered_resource_id: id.to_string(),
                a46_name: bsp.to_string(),
                eda_name: format!("EDA {}", id),
            };
            self.repo.create(AssetKind::Aggregator, &eda).await.unwrap();
        }

        async fn raw(&self, id: &str) -> Value {
            self.repo.get_raw(id).await.unwrap().unwrap()
        }
    }

    fn org(id: &str, role: OrganizationRole) -> Organization {
        Organization::new(id, role)
    }

    fn metering(id: &str, site: &str) -> MeteringRecord {
        MeteringRecord {
            metering_id: id.to_string(),
            site_id: site.to_string(),
            time_interval_start: "100".to_string(),
            time_interval_end: "200".to_string(),
            resolution: "PT30M".to_string(),
            points: vec![Point::new("1", "3", "100", "200")],
        }
    }

    #[tokio::test]
    async fn test_dso_cannot_update_hv_record() {
        let world = World::new();
        world.seed_site("S1", VoltageType::HV, "dso-a", "prod-a", "eda-1").await;
        world
            .repo
            .create(AssetKind::MeteringRecordHv, &metering("H1", "S1"))
            .await
            .unwrap();

        let err = world
            .authz
            .ensure(
                AssetKind::MeteringRecordHv,
                Operation::Update,
                &org("dso-a", OrganizationRole::Dso),
                "H1",
                &world.raw("H1").await,
            )
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("OrganizationType is not allowed to update HV."));
        assert!(message.contains("MeteringRecordHV resulted in an Error for H1."));
    }

    #[tokio::test]
    async fn test_bsp_updates_hv_through_aggregator_chain() {
        let world = World::new();
        world.seed_site("S1", VoltageType::HV, "dso-a", "prod-a", "eda-1").await;
        world.seed_aggregator("eda-1", "bsp-x").await;
        world
            .repo
            .create(AssetKind::MeteringRecordHv, &metering("H1", "S1"))
            .await
            .unwrap();

        let doc = world.raw("H1").await;
        let allowed = world
            .authz
            .can_act(
                AssetKind::MeteringRecordHv,
                Operation::Update,
                &org("bsp-x", OrganizationRole::Bsp),
                &doc,
            )
            .await
            .unwrap();
        assert!(allowed.is_allowed());

        let other = world
            .authz
            .can_act(
                AssetKind::MeteringRecordHv,
                Operation::Update,
                &org("bsp-y", OrganizationRole::Bsp),
                &doc,
            )
            .await
            .unwrap();
        assert!(!other.is_allowed());
    }

    #[tokio::test]
    async fn test_ownership_fails_closed_on_missing_link() {
        let world = World::new();
        // Site wired to an aggregator that does not exist.
        world.seed_site("S1", VoltageType::HV, "dso-a", "prod-a", "eda-ghost").await;
        world
            .repo
            .create(AssetKind::MeteringRecordHv, &metering("H1", "S1"))
            .await
            .unwrap();

        let decision = world
            .authz
            .can_act(
                AssetKind::MeteringRecordHv,
                Operation::Update,
                &org("bsp-x", OrganizationRole::Bsp),
                &world.raw("H1").await,
            )
            .await
            .unwrap();
        // Denied, not errored.
        assert!(!decision.is_allowed());
    }

    #[tokio::test]
    async fn test_bid_ownership_create_and_read() {
        let world = World::new();
        world.seed_aggregator("eda-1", "bsp-x").await;
        world.seed_aggregator("eda-2", "bsp-y").await;

        let bid = |id: &str, eda: &str| Bid {
            bid_id: id.to_string(),
            eda_registered_resource_id: eda.to_string(),
            registered_resource_mrid: "rr-1".to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "1000".to_string(),
            points: vec![],
        };

        let bsp_x = org("bsp-x", OrganizationRole::Bsp);
        let payload = serde_json::to_value(bid("B1", "eda-1")).unwrap();
        assert!(world
            .authz
            .can_create(AssetKind::Bid, &bsp_x, &payload)
            .await
            .unwrap()
            .is_allowed());

        world.repo.create(AssetKind::Bid, &bid("B2", "eda-2")).await.unwrap();
        let err = world
            .authz
            .ensure(AssetKind::Bid, Operation::Read, &bsp_x, "B2", &world.raw("B2").await)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Bid resulted in an Error for B2."));
    }

    #[tokio::test]
    async fn test_site_create_voltage_split() {
        let world = World::new();
        let payload = |voltage: &str, dso: &str| {
            serde_json::json!({
                "siteId": "S1",
                "voltageType": voltage,
                "a04RegisteredResourceMrid": dso,
                "producerMrid": "prod-a",
                "edaRegisteredResourceId": "eda-1",
                "meteringPointMrid": "MP-1",
            })
        };

        let tso = org("tso-1", OrganizationRole::Tso);
        let dso = org("dso-a", OrganizationRole::Dso);

        assert!(world
            .authz
            .can_create(AssetKind::Site, &tso, &payload("HV", "dso-a"))
            .await
            .unwrap()
            .is_allowed());
        assert!(!world
            .authz
            .can_create(AssetKind::Site, &tso, &payload("MV", "dso-a"))
            .await
            .unwrap()
            .is_allowed());
        assert!(world
            .authz
            .can_create(AssetKind::Site, &dso, &payload("MV", "dso-a"))
            .await
            .unwrap()
            .is_allowed());
        // A DSO cannot register sites for a sibling DSO.
        assert!(!world
            .authz
            .can_create(AssetKind::Site, &dso, &payload("MV", "dso-b"))
            .await
            .unwrap()
            .is_allowed());
        assert!(!world
            .authz
            .can_create(
                AssetKind::Site,
                &org("prod-a", OrganizationRole::Producer),
                &payload("MV", "dso-a")
            )
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_dso_list_visibility() {
        let world = World::new();
        world.seed_site("S1", VoltageType::MV, "dso-a", "prod-a", "eda-1").await;
        world.seed_site("S2", VoltageType::MV, "dso-b", "prod-b", "eda-2").await;

        let all = world
            .repo
            .query_raw(AssetKind::Site, &flex_core::Selector::new())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let visible = world
            .authz
            .filter_visible(AssetKind::Site, &org("dso-a", OrganizationRole::Dso), all.clone())
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(doc_str(&visible[0], "siteId"), "S1");

        // TSO is exempt from post-filtering.
        let tso_view = world
            .authz
            .filter_visible(AssetKind::Site, &org("tso-1", OrganizationRole::Tso), all)
            .await
            .unwrap();
        assert_eq!(tso_view.len(), 2);
    }

    #[tokio::test]
    async fn test_producer_gets_empty_bid_list() {
        let world = World::new();
        world.seed_aggregator("eda-1", "bsp-x").await;
        let bid = Bid {
            bid_id: "B1".to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            registered_resource_mrid: "rr-1".to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "1000".to_string(),
            points: vec![],
        };
        world.repo.create(AssetKind::Bid, &bid).await.unwrap();

        let all = world
            .repo
            .query_raw(AssetKind::Bid, &flex_core::Selector::new())
            .await
            .unwrap();
        let visible = world
            .authz
            .filter_visible(AssetKind::Bid, &org("prod-a", OrganizationRole::Producer), all)
            .await
            .unwrap();
        assert!(visible.is_empty());
    }

    #[tokio::test]
    async fn test_dso_reads_bid_through_portfolio() {
        let world = World::new();
        world.seed_aggregator("eda-1", "bsp-x").await;
        world.seed_site("S1", VoltageType::MV, "dso-a", "prod-a", "eda-1").await;
        let bid = Bid {
            bid_id: "B1".to_string(),
            eda_registered_resource_id: "eda-1".to_string(),
            registered_resource_mrid: "rr-1".to_string(),
            time_interval_start: "0".to_string(),
            time_interval_end: "1000".to_string(),
            points: vec![],
        };
        world.repo.create(AssetKind::Bid, &bid).await.unwrap();
        let doc = world.raw("B1").await;

        assert!(world
            .authz
            .can_act(AssetKind::Bid, Operation::Read, &org("dso-a", OrganizationRole::Dso), &doc)
            .await
            .unwrap()
            .is_allowed());
        assert!(!world
            .authz
            .can_act(AssetKind::Bid, Operation::Read, &org("dso-b", OrganizationRole::Dso), &doc)
            .await
            .unwrap()
            .is_allowed());
    }

    #[tokio::test]
    async fn test_order_voltage_rule() {
        let world = World::new();
        world.seed_site("S-hv", VoltageType::HV, "dso-a", "prod-a", "eda-1").await;
        world.seed_site("S-mv", VoltageType::MV, "dso-a", "prod-a", "eda-1").await;

        let order = |site: &str| {
            serde_json::json!({
                "orderId": "O1",
                "siteId": site,
                "orderValue": "10",
                "createdTimestamp": "1700000000",
                "timeZone": "Europe/Madrid",
                "logOrders": [],
            })
        };

        let tso = org("tso-1", OrganizationRole::Tso);
        let dso = org("dso-a", OrganizationRole::Dso);

        assert!(world
            .authz
            .can_create(AssetKind::OrderBySite, &tso, &order("S-hv"))
            .await
            .unwrap()
            .is_allowed());
        assert!(!world
            .authz
            .can_create(AssetKind::OrderBySite, &tso, &order("S-mv"))
            .await
            .unwrap()
            .is_allowed());
        assert!(world
            .authz
            .can_create(AssetKind::OrderBySite, &dso, &order("S-mv"))
            .await
            .unwrap()
            .is_allowed());
        // Dangling site reference fails closed.
        assert!(!world
            .authz
            .can_create(AssetKind::OrderBySite, &tso, &order("S-ghost"))
            .await
            .unwrap()
            .is_allowed());
    }
}
