//! Schedule Handler

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_authz::Operation;
use flex_core::{AssetKind, Organization, Schedule, ScheduleFilter};

use super::{optional_filter, required_arg, strip_tag, strip_tags, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const KIND: AssetKind = AssetKind::Schedule;

pub struct ScheduleHandler {
    state: AppState,
}

impl ScheduleHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AssetHandler for ScheduleHandler {
    fn name(&self) -> &'static str {
        KIND.handler_name()
    }

    async fn handle(
        &self,
        operation: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        match operation {
            "createSchedule" => {
                let schedule: Schedule = required_arg(args, 0, "schedule")?;
                let payload =
                    serde_json::to_value(&schedule).map_err(flex_store::StoreError::from)?;
                self.state
                    .authz
                    .ensure_create(KIND, caller, &schedule.schedule_id, &payload)
                    .await?;
                self.state.repository.create(KIND, &schedule).await?;
                info!(
                    asset_id = %schedule.schedule_id,
                    operation = "createSchedule",
                    caller = %caller.organization_id,
                    "schedule created"
                );
                Ok(Some(payload))
            }
            "updateSchedule" => {
                let schedule: Schedule = required_arg(args, 0, "schedule")?;
                let existing = self
                    .state
                    .repository
                    .get_raw(&schedule.schedule_id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&schedule.schedule_id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Update, caller, &schedule.schedule_id, &existing)
                    .await?;
                self.state.repository.update(KIND, &schedule).await?;
                Ok(Some(serde_json::to_value(&schedule).map_err(flex_store::StoreError::from)?))
            }
            "getSchedule" => {
                let schedule_id: String = required_arg(args, 0, "scheduleId")?;
                let doc = self
                    .state
                    .repository
                    .get_raw(&schedule_id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&schedule_id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Read, caller, &schedule_id, &doc)
                    .await?;
                Ok(Some(strip_tag(doc)))
            }
            "querySchedules" => {
                let filter: ScheduleFilter = optional_filter(args, 0)?;
                let documents = self
                    .state
                    .repository
                    .query_raw(KIND, &filter.to_selector())
                    .await?;
                let visible = self
                    .state
                    .authz
                    .filter_visible(KIND, caller, documents)
                    .await?;
                Ok(Some(Value::Array(strip_tags(visible))))
            }
            _ => Err(ApiError::no_such_operation(self.name(), operation)),
        }
    }
}
