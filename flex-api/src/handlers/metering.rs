//! Metering Record Handlers
//!
//! One handler instance per collection (HV, MV); the operation tokens
//! carry the collection suffix (`createHV`, `bulkUpdateMV`, ...). Bulk
//! variants authorize and persist per item, failing fast - atomicity
//! across items belongs to the surrounding ledger transaction.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_authz::Operation;
use flex_core::{AssetKind, MeteringFilter, MeteringRecord, Organization};

use super::{optional_filter, required_arg, strip_tag, strip_tags, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub struct MeteringHandler {
    state: AppState,
    kind: AssetKind,
    suffix: &'static str,
}

impl MeteringHandler {
    /// Handler for the HV collection
    pub fn hv(state: AppState) -> Self {
        Self {
            state,
            kind: AssetKind::MeteringRecordHv,
            suffix: "HV",
        }
    }

    /// Handler for the MV collection
    pub fn mv(state: AppState) -> Self {
        Self {
            state,
            kind: AssetKind::MeteringRecordMv,
            suffix: "MV",
        }
    }

    async fn create(&self, record: MeteringRecord, caller: &Organization) -> ApiResult<Value> {
        let payload = serde_json::to_value(&record).map_err(flex_store::StoreError::from)?;
        self.state
            .authz
            .ensure_create(self.kind, caller, &record.metering_id, &payload)
            .await?;
        self.state.repository.create(self.kind, &record).await?;
        info!(
            asset_id = %record.metering_id,
            asset_type = self.kind.tag(),
            caller = %caller.organization_id,
            "metering record created"
        );
        Ok(payload)
    }

    async fn update(&self, record: MeteringRecord, caller: &Organization) -> ApiResult<Value> {
        let existing = self
            .state
            .repository
            .get_raw(&record.metering_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&record.metering_id))?;
        self.state
            .authz
            .ensure(self.kind, Operation::Update, caller, &record.metering_id, &existing)
            .await?;
        self.state.repository.update(self.kind, &record).await?;
        serde_json::to_value(&record)
            .map_err(flex_store::StoreError::from)
            .map_err(ApiError::from)
    }

    async fn get(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let metering_id: String = required_arg(args, 0, "meteringId")?;
        let doc = self
            .state
            .repository
            .get_raw(&metering_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&metering_id))?;
        self.state
            .authz
            .ensure(self.kind, Operation::Read, caller, &metering_id, &doc)
            .await?;
        Ok(Some(strip_tag(doc)))
    }

    async fn query(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let filter: MeteringFilter = optional_filter(args, 0)?;
        let documents = self
            .state
            .repository
            .query_raw(self.kind, &filter.to_selector())
            .await?;
        let visible = self
            .state
            .authz
            .filter_visible(self.kind, caller, documents)
            .await?;
        Ok(Some(Value::Array(strip_tags(visible))))
    }
}

#[async_trait]
impl AssetHandler for MeteringHandler {
    fn name(&self) -> &'static str {
        self.kind.handler_name()
    }

    async fn handle(
        &self,
        operation: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        let Some(action) = operation.strip_suffix(self.suffix) else {
            return Err(ApiError::no_such_operation(self.name(), operation));
        };
        match action {
            "create" => {
                let record: MeteringRecord = required_arg(args, 0, "meteringRecord")?;
                Ok(Some(self.create(record, caller).await?))
            }
            "update" => {
                let record: MeteringRecord = required_arg(args, 0, "meteringRecord")?;
                Ok(Some(self.update(record, caller).await?))
            }
            "bulkCreate" => {
                let records: Vec<MeteringRecord> = required_arg(args, 0, "meteringRecords")?;
                let mut created = Vec::with_capacity(records.len());
                for record in records {
                    created.push(self.create(record, caller).await?);
                }
                Ok(Some(Value::Array(created)))
            }
            "bulkUpdate" => {
                let records: Vec<MeteringRecord> = required_arg(args, 0, "meteringRecords")?;
                let mut updated = Vec::with_capacity(records.len());
                for record in records {
                    updated.push(self.update(record, caller).await?);
                }
                Ok(Some(Value::Array(updated)))
            }
            "get" => self.get(args, caller).await,
            "query" => self.query(args, caller).await,
            _ => Err(ApiError::no_such_operation(self.name(), operation)),
        }
    }
}
