//! Bid Policy
//!
//! Bids are placed and maintained by the BSP owning the referenced
//! aggregator. A DSO may read bids whose aggregator is wired to a site
//! in its portfolio; producers have no interest in bids and are denied
//! outright (which lists render as emptiness, not an error).

use serde_json::Value;

use flex_core::{AssetKind, Organization, OrganizationRole, SiteFilter};
use flex_store::StoreResult;

use super::{doc_str, owned_or_denied, role_denied, AuthorizationResolver, Operation};
use crate::chain::Chain;
use crate::decision::Decision;

const KIND: AssetKind = AssetKind::Bid;

pub(crate) async fn can_create(
    resolver: &AuthorizationResolver,
    caller: &Organization,
    payload: &Value,
) -> StoreResult<Decision> {
    if caller.role != OrganizationRole::Bsp {
        return Ok(role_denied(Operation::Create, KIND));
    }
    let bid_id = doc_str(payload, "bidId");
    owned_or_denied(resolver, payload, &Chain::bid_to_bsp(), caller, bid_id).await
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let bid_id = doc_str(asset, "bidId");
    match op {
        Operation::Update => {
            if caller.role != OrganizationRole::Bsp {
                return Ok(role_denied(op, KIND));
            }
            owned_or_denied(resolver, asset, &Chain::bid_to_bsp(), caller, bid_id).await
        }
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::bid_to_bsp(), caller, bid_id).await
            }
            OrganizationRole::Dso => {
                let eda_id = doc_str(asset, "edaRegisteredResourceId");
                if dso_portfolio_references(resolver, caller, eda_id).await? {
                    Ok(Decision::allow())
                } else {
                    Ok(super::ownership_denied(caller, bid_id))
                }
            }
            OrganizationRole::Producer => Ok(role_denied(op, KIND)),
        },
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, KIND)),
    }
}

/// In-memory portfolio scan; the selector language cannot join sites
/// against a bid's aggregator reference.
async fn dso_portfolio_references(
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
