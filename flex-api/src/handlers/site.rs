//! Site Handler

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use flex_core::{AssetKind, Organization, Site, SiteFilter};
use flex_authz::Operation;

use super::{optional_filter, required_arg, strip_tag, strip_tags, AssetHandler};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const KIND: AssetKind = AssetKind::Site;

pub struct SiteHandler {
    state: AppState,
}

impl SiteHandler {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn create(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let site: Site = required_arg(args, 0, "site")?;
        let payload = serde_json::to_value(&site).map_err(flex_store::StoreError::from)?;
        self.state
            .authz
            .ensure_create(KIND, caller, &site.site_id, &payload)
            .await?;
        self.state.repository.create(KIND, &site).await?;
        info!(asset_id = %site.site_id, operation = "createSite", caller = %caller.organization_id, "site created");
        Ok(Some(payload))
    }

    async fn update(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let site: Site = required_arg(args, 0, "site")?;
        let existing = self
            .state
            .repository
            .get_raw(&site.site_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&site.site_id))?;
        self.state
            .authz
            .ensure(KIND, Operation::Update, caller, &site.site_id, &existing)
            .await?;
        self.state.repository.update(KIND, &site).await?;
        info!(asset_id = %site.site_id, operation = "updateSite", caller = %caller.organization_id, "site updated");
        Ok(Some(serde_json::to_value(&site).map_err(flex_store::StoreError::from)?))
    }

    async fn get(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let site_id: String = required_arg(args, 0, "siteId")?;
        let doc = self
            .state
            .repository
            .get_raw(&site_id)
            .await?
            .ok_or_else(|| flex_store::StoreError::not_found(&site_id))?;
        self.state
            .authz
            .ensure(KIND, Operation::Read, caller, &site_id, &doc)
            .await?;
        Ok(Some(strip_tag(doc)))
    }

    async fn query(&self, args: &[Value], caller: &Organization) -> ApiResult<Option<Value>> {
        let filter: SiteFilter = optional_filter(args, 0)?;
        let documents = self
            .state
            .repository
            .query_raw(KIND, &filter.to_selector())
            .await?;
        let visible = self.state.authz.filter_visible(KIND, caller, documents).await?;
        Ok(Some(Value::Array(strip_tags(visible))))
    }
}

#[async_trait]
impl AssetHandler for SiteHandler {
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
            "createSite" => self.create(args, caller).await,
            "updateSite" => self.update(args, caller).await,
            "getSite" => self.get(args, caller).await,
            "querySites" => self.query(args, caller).await,
            _ => Err(ApiError::no_such_operation(self.name(), operation)),
        }
    }
}
