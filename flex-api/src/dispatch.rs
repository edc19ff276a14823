//! Dispatch Table
//!
//! Routes an inbound `"<AssetType>.<operation>"` token to its handler.
//! The table is a plain map built once at startup - no reflection, no
//! method-name lookup at call time. Either token failing to resolve
//! reports `NoSuchOperation`.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use flex_core::Organization;

use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{
    AggregatorHandler, AssetHandler, BidHandler, EndpointHandler, MeteringHandler, OrderHandler,
    ScheduleHandler, SiteHandler,
};
use crate::state::AppState;

/// Handler registry keyed by asset-type token
pub struct Dispatcher {
    handlers: HashMap<&'static str, Arc<dyn AssetHandler>>,
}

impl Dispatcher {
    /// Build the full handler table over shared state
    pub fn new(state: AppState) -> Self {
        let handlers: Vec<Arc<dyn AssetHandler>> = vec![
            Arc::new(SiteHandler::new(state.clone())),
            Arc::new(AggregatorHandler::new(state.clone())),
            Arc::new(EndpointHandler::new(state.clone())),
            Arc::new(MeteringHandler::hv(state.clone())),
            Arc::new(MeteringHandler::mv(state.clone())),
            Arc::new(BidHandler::new(state.clone())),
            Arc::new(ScheduleHandler::new(state.clone())),
            Arc::new(OrderHandler::new(state)),
        ];
        Self {
            handlers: handlers.into_iter().map(|h| (h.name(), h)).collect(),
        }
    }

    /// Resolve and execute one call
    pub async fn dispatch(
        &self,
        call: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        let Some((asset_type, operation)) = call.split_once('.') else {
            return Err(ApiError::NoSuchOperation {
                call: call.to_string(),
            });
        };
        let Some(handler) = self.handlers.get(asset_type) else {
            return Err(ApiError::NoSuchOperation {
                call: call.to_string(),
            });
        };
        debug!(call, caller = %caller.organization_id, role = %caller.role, "dispatching");
        handler.handle(operation, args, caller).await
    }

    /// Platform-facing entry: JSON argument array, JSON-encoded caller
    /// organization, enveloped response.
    pub async fn execute(&self, call: &str, args: Vec<Value>, caller: Value) -> Envelope {
        let caller: Organization = match serde_json::from_value(caller) {
            Ok(organization) => organization,
            Err(e) => {
                return Envelope::failure(format!("Bad request: invalid caller organization: {}", e))
            }
        };
        match self.dispatch(call, &args, &caller).await {
            Ok(payload) => Envelope::ok(payload),
            Err(error) => Envelope::failure(error.to_string()),
        }
    }
}
