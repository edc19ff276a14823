//! Bid Handler

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_authz::Operation;
use flex_core::{AssetKind, Bid, BidFilter, Organization};

use super::{optional_filter, required_arg, strip_tag, strip_tags, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const KIND: AssetKind = AssetKind::Bid;

pub struct BidHandler {
    state: AppState,
}

impl BidHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl AssetHandler for BidHandler {
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
            "createBid" => {
                let bid: Bid = required_arg(args, 0, "bid")?;
                let payload = serde_json::to_value(&bid).map_err(flex_store::StoreError::from)?;
                self.state
                    .authz
                    .ensure_create(KIND, caller, &bid.bid_id, &payload)
                    .await?;
                self.state.repository.create(KIND, &bid).await?;
                info!(asset_id = %bid.bid_id, operation = "createBid", caller = %caller.organization_id, "bid created");
                Ok(Some(payload))
            }
            "updateBid" => {
                let bid: Bid = required_arg(args, 0, "bid")?;
                let existing = self
                    .state
                    .repository
                    .get_raw(&bid.bid_id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&bid.bid_id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Update, caller, &bid.bid_id, &existing)
                    .await?;
                self.state.repository.update(KIND, &bid).await?;
                Ok(Some(serde_json::to_value(&bid).map_err(flex_store::StoreError::from)?))
            }
            "getBid" => {
                let bid_id: String = required_arg(args, 0, "bidId")?;
                let doc = self
                    .state
                    .repository
                    .get_raw(&bid_id)
                    .await?
                    .ok_or_else(|| flex_store::StoreError::not_found(&bid_id))?;
                self.state
                    .authz
                    .ensure(KIND, Operation::Read, caller, &bid_id, &doc)
                    .await?;
                Ok(Some(strip_tag(doc)))
            }
            "queryBids" => {
                let filter: BidFilter = optional_filter(args, 0)?;
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
