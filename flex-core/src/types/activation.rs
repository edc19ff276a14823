//! Activation View
//!
//! The derived, read-only consolidation of one order with its site,
//! aggregator, bid, schedule and metering context. Never persisted;
//! rebuilt per read. Fields that could not be resolved carry `"-"`
//! (degrade, don't fail - this view feeds dashboards, not settlement).

use serde::{Deserialize, Serialize};

use super::{LogOrder, Point};

/// Placeholder for derived fields whose source asset is missing
pub const UNRESOLVED: &str = "-";

/// Consolidated activation view, assembled per order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    /// Aggregator display name
    pub eda_name: String,
    /// Aggregator registry id
    pub eda_registered_resource_id: String,
    /// Site metering point code
    pub metering_point_mrid: String,
    /// Site voltage class
    pub voltage_type: String,
    /// Selected bid's registered resource, `"-"` when no bid covers
    pub bid_registered_resource_mrid: String,
    /// Order creation date, short format
    pub order_date: String,
    /// Order creation time, short format in the order's timezone
    pub order_time: String,
    /// Ids of the schedules contributing points
    pub schedule_ids: Vec<String>,
    /// Clipped, re-indexed schedule series
    pub schedule_points: Vec<Point>,
    /// Clipped, re-indexed metering series
    pub metering_points: Vec<Point>,
    /// Full lifecycle log of the order
    pub log_orders: Vec<LogOrder>,
    /// Order id; omitted for Producer callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Ordered activation value; omitted for Producer callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_value: Option<String>,
}

impl Activation {
    /// View with every derived field defaulted, used when the order's
    /// site cannot be resolved. The order itself is kept, not dropped.
    pub fn unresolved(log_orders: Vec<LogOrder>) -> Self {
        Self {
            eda_name: UNRESOLVED.to_string(),
            eda_registered_resource_id: UNRESOLVED.to_string(),
            metering_point_mrid: UNRESOLVED.to_string(),
            voltage_type: UNRESOLVED.to_string(),
            bid_registered_resource_mrid: UNRESOLVED.to_string(),
            order_date: UNRESOLVED.to_string(),
            order_time: UNRESOLVED.to_string(),
            schedule_ids: Vec::new(),
            schedule_points: Vec::new(),
            metering_points: Vec::new(),
            log_orders,
            order_id: None,
            order_value: None,
        }
    }
}
