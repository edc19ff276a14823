//! Balancing Bids

use serde::{Deserialize, Serialize};

use super::{LedgerAsset, Point};
use crate::selector::Selector;

/// Bid asset - a BSP's offer for the resources behind one Aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Unique bid id, also the ledger key
    pub bid_id: String,
    /// Referenced Aggregator (EDA)
    pub eda_registered_resource_id: String,
    /// Registered resource the bid is placed for
    pub registered_resource_mrid: String,
    /// Bid interval start, epoch seconds
    pub time_interval_start: String,
    /// Bid interval end, epoch seconds
    pub time_interval_end: String,
    /// Offered quantity series
    pub points: Vec<Point>,
}

impl LedgerAsset for Bid {
    fn asset_id(&self) -> &str {
        &self.bid_id
    }
}

impl Bid {
    /// Whether the bid interval fully covers `[start, end]`
    pub fn covers(&self, start: &str, end: &str) -> bool {
        crate::window::covers(
            &self.time_interval_start,
            &self.time_interval_end,
            start,
            end,
        )
    }
}

/// Explicit query filter for bids
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BidFilter {
    pub eda_registered_resource_id: Option<String>,
    pub registered_resource_mrid: Option<String>,
}

impl BidFilter {
    pub fn to_selector(&self) -> Selector {
        let mut selector = Selector::new();
        if let Some(v) = &self.eda_registered_resource_id {
            selector = selector.eq("edaRegisteredResourceId", v.clone());
        }
        if let Some(v) = &self.registered_resource_mrid {
            selector = selector.eq("registeredResourceMrid", v.clone());
        }
        selector
    }
}
