//! Activation Order Handler
//!
//! Besides the usual document lifecycle this handler owns the two
//! order-specific paths: `appendLogOrder`, the only write the activating
//! parties (BSP, producer) get, and `viewActivations`, the consolidated
//! read built by the activation aggregator over the caller-visible
//! orders.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_authz::Operation;
use flex_core::{
    AssetKind, LogOrder, OrderBySiteActivationDocument, OrderFilter, Organization,
};

use super::{optional_filter, required_arg, strip_tag, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const KIND: AssetKind = AssetKind::OrderBySite;

pub struct OrderHandler {
    state: AppState,
}

impl OrderHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn create(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let order: OrderBySiteActivationDocument = required_arg(args, 0, "order")?;
        let payload = serde_json::to_value(&order).map_err(flex_store::StoreError::from)?;
        self.state
            .authz
            .ensure_create(KIND, caller, &order.order_id, &payload)
            .await?;
        self.state.repository.create(KIND, &order).await?;
        info!(asset_id = %order.order_id, operation = "createOrder", caller = %caller.organization_id, "order created");
        Ok(Some(payload))
    }

    async fn update(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let order: OrderBySiteActivationDocument = required_arg(args, 0, "order")?;
        let existing = self
            .state
            .repository
            .get_raw(&order.order_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&order.order_id))?;
        self.state
            .authz
            .ensure(KIND, Operation::Update, caller, &order.order_id, &existing)
            .await?;
        self.state.repository.update(KIND, &order).await?;
        Ok(Some(serde_json::to_value(&order).map_err(flex_store::StoreError::from)?))
    }

    /// Append one lifecycle entry. Existing entries are never touched;
    /// the entry is stamped with the authenticated caller, whatever the
    /// submitted document claimed.
    async fn append_log(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let order_id: String = required_arg(args, 0, "orderId")?;
        let mut entry: LogOrder = required_arg(args, 1, "logOrder")?;

        let existing = self
            .state
            .repository
            .get_raw(&order_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&order_id))?;
        self.state
            .authz
            .ensure(KIND, Operation::AppendLog, caller, &order_id, &existing)
            .await?;

        let mut order: OrderBySiteActivationDocument =
            serde_json::from_value(existing).map_err(flex_store::StoreError::from)?;
        entry.creator = caller.organization_id.clone();
        entry.creator_role = caller.role;
        order.log_orders.push(entry);
        self.state.repository.update(KIND, &order).await?;
        info!(asset_id = %order_id, operation = "appendLogOrder", caller = %caller.organization_id, "log order appended");
        Ok(Some(serde_json::to_value(&order).map_err(flex_store::StoreError::from)?))
    }

    async fn get(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let order_id: String = required_arg(args, 0, "orderId")?;
        let doc = self
            .state
            .repository
            .get_raw(&order_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&order_id))?;
        self.state
            .authz
            .ensure(KIND, Operation::Read, caller, &order_id, &doc)
            .await?;
        Ok(Some(strip_tag(doc)))
    }

    /// Orders of the type visible to the caller, post-filtered
    async fn visible_orders(
        &self,
        filter: &OrderFilter,
        caller: &Organization,
    ) -> ApiResult<Vec<OrderBySiteActivationDocument>> {
        let documents = self
            .state
            .repository
            .query_raw(KIND, &filter.to_selector())
            .await?;
        let visible = self.state.authz.filter_visible(KIND, caller, documents).await?;
        let mut orders = Vec::with_capacity(visible.len());
        for doc in visible {
            orders.push(serde_json::from_value(doc).map_err(flex_store::StoreError::from)?);
        }
        Ok(orders)
    }

    async fn query(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let filter: OrderFilter = optional_filter(args, 0)?;
        let orders = self.visible_orders(&filter, caller).await?;
        Ok(Some(serde_json::to_value(orders).map_err(flex_store::StoreError::from)?))
    }

    /// The consolidated activation view over the caller-visible orders
    async fn view_activations(
        &self,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>> {
        let filter: OrderFilter = optional_filter(args, 0)?;
        let orders = self.visible_orders(&filter, caller).await?;
        let activations = self.state.activations.build_all(&orders, caller).await?;
        Ok(Some(serde_json::to_value(activations).map_err(flex_store::StoreError::from)?))
    }
}

#[async_trait]
impl AssetHandler for OrderHandler {
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
            "createOrder" => self.create(args, caller).await,
            "updateOrder" => self.update(args, caller).await,
            "appendLogOrder" => self.append_log(args, caller).await,
            "getOrder" => self.get(args, caller).await,
            "queryOrders" => self.query(args, caller).await,
            "viewActivations" => self.view_activations(args, caller).await,
            _ => Err(ApiError::no_such_operation(self.name(), operation)),
        }
    }
}
