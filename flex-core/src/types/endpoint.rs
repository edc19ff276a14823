//! Endpoint (EDP) Registry Asset

use serde::{Deserialize, Serialize};

use super::LedgerAsset;
use crate::selector::Selector;

/// Endpoint asset - a billing/technical reference point attached to a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Unique EDP registry id, also the ledger key
    pub edp_registered_resource_id: String,
    /// Referenced site
    pub site_id: String,
    /// Display name
    pub edp_name: String,
}

impl LedgerAsset for Endpoint {
    fn asset_id(&self) -> &str {
        &self.edp_registered_resource_id
    }
}

/// Explicit query filter for endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointFilter {
    pub site_id: Option<String>,
}

impl EndpointFilter {
    pub fn to_selector(&self) -> Selector {
        let mut selector = Selector::new();
        if let Some(v) = &self.site_id {
            selector = selector.eq("siteId", v.clone());
        }
        selector
    }
}
