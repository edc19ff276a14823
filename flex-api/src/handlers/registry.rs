//! Aggregator and Endpoint Handlers
//!
//! The two TSO-maintained registries share one access pattern; their
//! handlers differ only in type and filter.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_authz::Operation;
use flex_core::{Aggregator, AssetKind, Endpoint, EndpointFilter, Organization, Selector};

use super::{optional_filter, required_arg, strip_tag, strip_tags, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub struct AggregatorHandler {
    state: AppState,
}

impl AggregatorHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AssetHandler for AggregatorHandler {
    fn name(&self) -> &'static str {
        AssetKind::Aggregator.handler_name()
    }

    async fn handle(
        &self,
        operation: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        const KIND: AssetKind = AssetKind::Aggregator;
        match operation {
            "createAggregator" => {
                let aggregator: Aggregator = required_arg(args, 0, "aggregator")?;
                let payload =
                    serde_json::to_value(&aggregator).map_err(flex_store::StoreError::from)?;
                self.state
                    .authz
                    .ensure_create(KIND, caller, &aggregator.eda_registered_resource_id, &payload)
                    .await?;
                self.state.repository.create(KIND, &aggregator).await?;
                info!(
                    asset_id = %aggregator.eda_registered_resource_id,
                    operation = "createAggregator",
                    caller = %caller.organization_id,
                    "aggregator created"
                );
                Ok(Some(payload))
            }
            "updateAggregator" => {
                let aggregator: Aggregator = required_arg(args, 0, "aggregator")?;
                let id = aggregator.eda_registered_resource_id.clone();
                let existing = self
                    .state
                    .repository
                    .get_raw(&id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Update, caller, &id, &existing)
                    .await?;
                self.state.repository.update(KIND, &aggregator).await?;
                Ok(Some(serde_json::to_value(&aggregator).map_err(flex_store::StoreError::from)?))
            }
            "getAggregator" => {
                let id: String = required_arg(args, 0, "edaRegisteredResourceId")?;
                let doc = self
                    .state
                    .repository
                    .get_raw(&id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Read, caller, &id, &doc)
                    .await?;
                Ok(Some(strip_tag(doc)))
            }
            "queryAggregators" => {
                let documents = self
                    .state
                    .repository
                    .query_raw(KIND, &Selector::new())
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

pub struct EndpointHandler {
    state: AppState,
}

impl EndpointHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AssetHandler for EndpointHandler {
    fn name(&self) -> &'static str {
        AssetKind::Endpoint.handler_name()
    }

    async fn handle(
        &self,
        operation: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        const KIND: AssetKind = AssetKind::Endpoint;
        match operation {
            "createEndpoint" => {
                let endpoint: Endpoint = required_arg(args, 0, "endpoint")?;
                let payload =
                    serde_json::to_value(&endpoint).map_err(flex_store::StoreError::from)?;
                self.state
                    .authz
                    .ensure_create(KIND, caller, &endpoint.edp_registered_resource_id, &payload)
                    .await?;
                self.state.repository.create(KIND, &endpoint).await?;
                info!(
                    asset_id = %endpoint.edp_registered_resource_id,
                    operation = "createEndpoint",
                    caller = %caller.organization_id,
                    "endpoint created"
                );
                Ok(Some(payload))
            }
            "updateEndpoint" => {
                let endpoint: Endpoint = required_arg(args, 0, "endpoint")?;
                let id = endpoint.edp_registered_resource_id.clone();
                let existing = self
                    .state
                    .repository
                    .get_raw(&id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Update, caller, &id, &existing)
                    .await?;
                self.state.repository.update(KIND, &endpoint).await?;
                Ok(Some(serde_json::to_value(&endpoint).map_err(flex_store::StoreError::from)?))
            }
            "getEndpoint" => {
                let id: String = required_arg(args, 0, "edpRegisteredResourceId")?;
                let doc = self
                    .state
                    .repository
                    .get_raw(&id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Read, caller, &id, &doc)
                    .await?;
                Ok(Some(strip_tag(doc)))
            }
            "queryEndpoints" => {
                let filter: EndpointFilter = optional_filter(args, 0)?;
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
