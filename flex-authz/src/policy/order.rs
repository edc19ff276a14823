//! Activation Order Policy
//!
//! Orders follow the voltage split: the TSO issues and maintains orders
//! for HV sites, a DSO for the MV sites it owns. The activating parties
//! (BSP, producer) never replace the document; they may only append to
//! its lifecycle log, gated by the site's aggregator/producer chains.

use serde_json::Value;

use flex_core::{AssetKind, Organization, OrganizationRole};
use flex_store::StoreResult;

use super::{doc_str, owned_or_denied, role_denied, voltage_denied, AuthorizationResolver, Operation};
use crate::chain::Chain;
use crate::decision::Decision;

const KIND: AssetKind = AssetKind::OrderBySite;

/// Fetch the referenced site, or `None` when the reference dangles
async fn referenced_site(
    resolver: &AuthorizationResolver,
    order: &Value,
) -> StoreResult<Option<Value>> {
    let site_id = doc_str(order, "siteId");
    if site_id.is_empty() {
        return Ok(None);
    }
    resolver.repository.get_raw(site_id).await
}

/// The TSO↔HV / DSO↔MV rule shared by create and update
async fn voltage_rule(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    order: &Value,
) -> StoreResult<Decision> {
    let order_id = doc_str(order, "orderId");
    let Some(site) = referenced_site(resolver, order).await? else {
        return Ok(Decision::deny(format!(
            "Referenced Site {} could not be resolved.",
            doc_str(order, "siteId")
        )));
    };
    let voltage = doc_str(&site, "voltageType");
    match caller.role {
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
            if doc_str(&site, "a04RegisteredResourceMrid") == caller.organization_id {
                Ok(Decision::allow())
            } else {
                Ok(super::ownership_denied(caller, order_id))
            }
        }
        _ => Ok(role_denied(op, KIND)),
    }
}

pub(crate) async fn can_create(
    resolver: &AuthorizationResolver,
    caller: &Organization,
    payload: &Value,
) -> StoreResult<Decision> {
    voltage_rule(resolver, Operation::Create, caller, payload).await
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let order_id = doc_str(asset, "orderId");
    match op {
        Operation::Update => voltage_rule(resolver, op, caller, asset).await,
        Operation::AppendLog => match caller.role {
            // Issuing operators stay bound to their voltage class.
            OrganizationRole::Tso | OrganizationRole::Dso => {
                voltage_rule(resolver, op, caller, asset).await
            }
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::order_to_bsp(), caller, order_id).await
            }
            OrganizationRole::Producer => {
                owned_or_denied(resolver, asset, &Chain::order_to_producer(), caller, order_id)
                    .await
            }
        },
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Dso => {
                owned_or_denied(resolver, asset, &Chain::order_to_dso(), caller, order_id).await
            }
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::order_to_bsp(), caller, order_id).await
            }
            OrganizationRole::Producer => {
                owned_or_denied(resolver, asset, &Chain::order_to_producer(), caller, order_id)
                    .await
            }
        },
        Operation::Create => Ok(role_denied(op, KIND)),
    }
}
