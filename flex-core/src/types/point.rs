//! Time-Series Points
//!
//! One sample of a metering, bid or schedule series. All temporal fields
//! are string-encoded epoch seconds, matching the ledger document shape;
//! comparisons are numeric, never lexicographic.

use serde::{Deserialize, Serialize};

/// One time-series sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Position id within the series ("1"-based after re-indexing)
    pub point_id: String,
    /// Measured or scheduled quantity
    pub quantity: String,
    /// Sample window start, epoch seconds
    pub time_stamp_start: String,
    /// Sample window end, epoch seconds
    pub time_stamp_end: String,
}

impl Point {
    pub fn new(
        point_id: impl Into<String>,
        quantity: impl Into<String>,
        time_stamp_start: impl Into<String>,
        time_stamp_end: impl Into<String>,
    ) -> Self {
        Self {
            point_id: point_id.into(),
            quantity: quantity.into(),
            time_stamp_start: time_stamp_start.into(),
            time_stamp_end: time_stamp_end.into(),
        }
    }

    /// Numeric start, if the encoded value parses
    pub fn start_epoch(&self) -> Option<i64> {
        crate::window::parse_epoch(&self.time_stamp_start)
    }

    /// Numeric end, if the encoded value parses
    pub fn end_epoch(&self) -> Option<i64> {
        crate::window::parse_epoch(&self.time_stamp_end)
    }
}
