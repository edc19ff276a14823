//! Schedule Policy
//!
//! Schedules are BSP planning documents; ownership resolves through
//! Endpoint → Site → Aggregator. The DSO of the underlying site may read
//! them; producers may not.

use serde_json::Value;

use flex_core::{AssetKind, Organization, OrganizationRole};
use flex_store::StoreResult;

use super::{doc_str, owned_or_denied, role_denied, AuthorizationResolver, Operation};
use crate::chain::Chain;
use crate::decision::Decision;

const KIND: AssetKind = AssetKind::Schedule;

pub(crate) async fn can_create(
    resolver: &AuthorizationResolver,
    caller: &Organization,
    payload: &Value,
) -> StoreResult<Decision> {
    if caller.role != OrganizationRole::Bsp {
        return Ok(role_denied(Operation::Create, KIND));
    }
    let schedule_id = doc_str(payload, "scheduleId");
    owned_or_denied(resolver, payload, &Chain::schedule_to_bsp(), caller, schedule_id).await
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let schedule_id = doc_str(asset, "scheduleId");
    match op {
        Operation::Update => {
            if caller.role != OrganizationRole::Bsp {
                return Ok(role_denied(op, KIND));
            }
            owned_or_denied(resolver, asset, &Chain::schedule_to_bsp(), caller, schedule_id).await
        }
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::schedule_to_bsp(), caller, schedule_id)
                    .await
            }
            OrganizationRole::Dso => {
                owned_or_denied(resolver, asset, &Chain::schedule_to_dso(), caller, schedule_id)
                    .await
            }
            OrganizationRole::Producer => Ok(role_denied(op, KIND)),
        },
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, KIND)),
    }
}
