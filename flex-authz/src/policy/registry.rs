//! Aggregator and Endpoint Policy
//!
//! Both registries are maintained by the TSO. Reads open up to the
//! organizations with a stake in the entry: the BSP named on an
//! aggregator, a DSO whose portfolio wires a site to it, and the
//! ownership chains hanging off an endpoint's site.

use serde_json::Value;

use flex_core::{AssetKind, Organization, OrganizationRole, SiteFilter};
use flex_store::StoreResult;

use super::{doc_str, owned_or_denied, role_denied, AuthorizationResolver, Operation};
use crate::chain::Chain;
use crate::decision::Decision;

pub(crate) fn can_create(kind: AssetKind, caller: &Organization) -> Decision {
    if caller.role == OrganizationRole::Tso {
        Decision::allow()
    } else {
        role_denied(Operation::Create, kind)
    }
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    kind: AssetKind,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    match kind {
        AssetKind::Aggregator => aggregator_act(resolver, op, caller, asset).await,
        AssetKind::Endpoint => endpoint_act(resolver, op, caller, asset).await,
        _ => unreachable!("registry policy handles aggregators and endpoints"),
    }
}

async fn aggregator_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let kind = AssetKind::Aggregator;
    let eda_id = doc_str(asset, "edaRegisteredResourceId");
    match op {
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Bsp => {
                if doc_str(asset, "a46Name") == caller.organization_id {
                    Ok(Decision::allow())
                } else {
                    Ok(super::ownership_denied(caller, eda_id))
                }
            }
            OrganizationRole::Dso => {
                if dso_references_aggregator(resolver, caller, eda_id).await? {
                    Ok(Decision::allow())
                } else {
                    Ok(super::ownership_denied(caller, eda_id))
                }
            }
            OrganizationRole::Producer => Ok(role_denied(op, kind)),
        },
        Operation::Update => {
            if caller.role == OrganizationRole::Tso {
                Ok(Decision::allow())
            } else {
                Ok(role_denied(op, kind))
            }
        }
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, kind)),
    }
}

async fn endpoint_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let kind = AssetKind::Endpoint;
    let edp_id = doc_str(asset, "edpRegisteredResourceId");
    match op {
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Dso => {
                owned_or_denied(resolver, asset, &Chain::endpoint_to_dso(), caller, edp_id).await
            }
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::endpoint_to_bsp(), caller, edp_id).await
            }
            OrganizationRole::Producer => {
                owned_or_denied(resolver, asset, &Chain::endpoint_to_producer(), caller, edp_id)
                    .await
            }
        },
        Operation::Update => {
            if caller.role == OrganizationRole::Tso {
                Ok(Decision::allow())
            } else {
                Ok(role_denied(op, kind))
            }
        }
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, kind)),
    }
}

/// Whether any site in the DSO's portfolio is wired to this aggregator.
/// The selector language cannot join, so the portfolio is fetched and
/// scanned in memory.
async fn dso_references_aggregator(
    resolver: &AuthorizationResolver,
    caller: &Organization,
    eda_id: &str,
) -> StoreResult<bool> {
    if eda_id.is_empty() {
        return Ok(false);
    }
    let filter = SiteFilter {
        a04_registered_resource_mrid: Some(caller.organization_id.clone()),
        ..Default::default()
    };
    let sites = resolver
        .repository
        .query_raw(AssetKind::Site, &filter.to_selector())
        .await?;
    Ok(sites
        .iter()
        .any(|site| doc_str(site, "edaRegisteredResourceId") == eda_id))
}
