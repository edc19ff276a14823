//! Power Plan Energy Schedules

use serde::{Deserialize, Serialize};

use super::{LedgerAsset, Point};
use crate::selector::Selector;

/// Schedule asset - a BSP's planned energy profile for one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Unique schedule id, also the ledger key
    pub schedule_id: String,
    /// Referenced Endpoint (EDP)
    pub edp_registered_resource_id: String,
    /// Schedule interval start, epoch seconds
    pub time_interval_start: String,
    /// Schedule interval end, epoch seconds
    pub time_interval_end: String,
    /// Planned quantity series
    pub points: Vec<Point>,
}

impl LedgerAsset for Schedule {
    fn asset_id(&self) -> &str {
        &self.schedule_id
    }
}

/// Explicit query filter for schedules
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleFilter {
    pub edp_registered_resource_id: Option<String>,
    /// Upper bound on `timeIntervalStart`
    pub interval_start_lte: Option<String>,
    /// Lower bound on `timeIntervalEnd`
    pub interval_end_gte: Option<String>,
}

impl ScheduleFilter {
    /// Overlap filter for one endpoint and a `[start, end)` window
    pub fn overlapping(edp_id: impl Into<String>, window_start: &str, window_end: &str) -> Self {
        Self {
            edp_registered_resource_id: Some(edp_id.into()),
            interval_start_lte: if window_end.is_empty() {
                None
            } else {
                Some(window_end.to_string())
            },
            interval_end_gte: if window_start.is_empty() {
                None
            } else {
                Some(window_start.to_string())
            },
        }
    }

    pub fn to_selector(&self) -> Selector {
        let mut selector = Selector::new();
        if let Some(v) = &self.edp_registered_resource_id {
            selector = selector.eq("edpRegisteredResourceId", v.clone());
        }
        if let Some(v) = &self.interval_start_lte {
            selector = selector.lte("timeIntervalStart", v.clone());
        }
        if let Some(v) = &self.interval_end_gte {
            selector = selector.gte("timeIntervalEnd", v.clone());
        }
        selector
    }
}
