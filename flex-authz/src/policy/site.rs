//! Site Policy
//!
//! HV sites are managed by the TSO, MV sites by their owning DSO; the
//! voltage class on the document decides which rule applies. Reads open
//! up along the ownership chains: the owning DSO, the owning producer
//! and the BSP behind the linked aggregator all see the site.

use serde_json::Value;

use flex_core::{Organization, OrganizationRole};
use flex_store::StoreResult;

use super::{
    doc_str, owned_or_denied, role_denied, voltage_denied, AuthorizationResolver, Operation,
};
use crate::chain::Chain;
use crate::decision::Decision;
use flex_core::AssetKind;

const KIND: AssetKind = AssetKind::Site;

pub(crate) async fn can_create(
    _resolver: &AuthorizationResolver,
    caller: &Organization,
    payload: &Value,
) -> StoreResult<Decision> {
    let voltage = doc_str(payload, "voltageType");
    let site_id = doc_str(payload, "siteId");
    match caller.role {
        OrganizationRole::Tso => {
            if voltage == "HV" {
                Ok(Decision::allow())
            } else {
                Ok(voltage_denied(Operation::Create, KIND, voltage))
            }
        }
        OrganizationRole::Dso => {
            if voltage != "MV" {
                return Ok(voltage_denied(Operation::Create, KIND, voltage));
            }
            // A DSO registers only its own sites.
            if doc_str(payload, "a04RegisteredResourceMrid") == caller.organization_id {
                Ok(Decision::allow())
            } else {
                Ok(super::ownership_denied(caller, site_id))
            }
        }
        _ => Ok(role_denied(Operation::Create, KIND)),
    }
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let site_id = doc_str(asset, "siteId");
    let voltage = doc_str(asset, "voltageType");
    match op {
        Operation::Update => match caller.role {
            OrganizationRole::Tso => {
                if voltage == "HV" {
                    Ok(Decision::allow())
                } else {
                    Ok(voltage_denied(op, KIND, voltage))
                }
            }
            OrganizationRole::Dso => {
                if voltage != "MV" {
                    return Ok(voltage_denied(op, KIND, voltage));
                }
                owned_or_denied(resolver, asset, &Chain::site_to_dso(), caller, site_id).await
            }
            _ => Ok(role_denied(op, KIND)),
        },
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Dso => {
                owned_or_denied(resolver, asset, &Chain::site_to_dso(), caller, site_id).await
            }
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::site_to_bsp(), caller, site_id).await
            }
            OrganizationRole::Producer => {
                owned_or_denied(resolver, asset, &Chain::site_to_producer(), caller, site_id).await
            }
        },
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, KIND)),
    }
}
