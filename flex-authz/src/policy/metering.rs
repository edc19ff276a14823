//! Metering Record Policy
//!
//! The HV collection is fed by the TSO and updated by the non-DSO roles
//! under their ownership chains; the MV collection belongs to the DSOs.
//! Reads open up along every chain that reaches the record's site.

use serde_json::Value;

use flex_core::{AssetKind, Organization, OrganizationRole};
use flex_store::StoreResult;

use super::{doc_str, owned_or_denied, role_denied, AuthorizationResolver, Operation};
use crate::chain::Chain;
use crate::decision::Decision;

pub(crate) async fn can_create(
    resolver: &AuthorizationResolver,
    kind: AssetKind,
    caller: &Organization,
    payload: &Value,
) -> StoreResult<Decision> {
    match kind {
        AssetKind::MeteringRecordHv => {
            if caller.role == OrganizationRole::Tso {
                Ok(Decision::allow())
            } else {
                Ok(role_denied(Operation::Create, kind))
            }
        }
        AssetKind::MeteringRecordMv => {
            if caller.role != OrganizationRole::Dso {
                return Ok(role_denied(Operation::Create, kind));
            }
            let metering_id = doc_str(payload, "meteringId");
            owned_or_denied(resolver, payload, &Chain::metering_to_dso(), caller, metering_id)
                .await
        }
        _ => unreachable!("metering policy handles HV and MV records"),
    }
}

pub(crate) async fn can_act(
    resolver: &AuthorizationResolver,
    kind: AssetKind,
    op: Operation,
    caller: &Organization,
    asset: &Value,
) -> StoreResult<Decision> {
    let metering_id = doc_str(asset, "meteringId");
    match op {
        Operation::Update => match (kind, caller.role) {
            (AssetKind::MeteringRecordHv, OrganizationRole::Tso) => Ok(Decision::allow()),
            (AssetKind::MeteringRecordHv, OrganizationRole::Bsp) => {
                owned_or_denied(resolver, asset, &Chain::metering_to_bsp(), caller, metering_id)
                    .await
            }
            (AssetKind::MeteringRecordHv, OrganizationRole::Producer) => {
                owned_or_denied(
                    resolver,
                    asset,
                    &Chain::metering_to_producer(),
                    caller,
                    metering_id,
                )
                .await
            }
            // The scenario every DSO integration hits first.
            (AssetKind::MeteringRecordHv, OrganizationRole::Dso) => Ok(role_denied(op, kind)),
            (AssetKind::MeteringRecordMv, OrganizationRole::Dso) => {
                owned_or_denied(resolver, asset, &Chain::metering_to_dso(), caller, metering_id)
                    .await
            }
            (AssetKind::MeteringRecordMv, _) => Ok(role_denied(op, kind)),
            _ => Ok(role_denied(op, kind)),
        },
        Operation::Read => match caller.role {
            OrganizationRole::Tso => Ok(Decision::allow()),
            OrganizationRole::Dso => {
                owned_or_denied(resolver, asset, &Chain::metering_to_dso(), caller, metering_id)
                    .await
            }
            OrganizationRole::Bsp => {
                owned_or_denied(resolver, asset, &Chain::metering_to_bsp(), caller, metering_id)
                    .await
            }
            OrganizationRole::Producer => {
                owned_or_denied(
                    resolver,
                    asset,
                    &Chain::metering_to_producer(),
                    caller,
                    metering_id,
                )
                .await
            }
        },
        Operation::Create | Operation::AppendLog => Ok(role_denied(op, kind)),
    }
}
