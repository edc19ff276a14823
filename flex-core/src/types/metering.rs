//! Metering Records
//!
//! One document per site and settlement interval, carrying the ordered
//! telemetry series. HV and MV records share one shape but live in two
//! collections: the HV collection is fed by the TSO, the MV collection by
//! the site's DSO.

use serde::{Deserialize, Serialize};

use super::{LedgerAsset, Point};
use crate::selector::Selector;

/// Metering record asset (HV or MV collection, decided by the caller)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeteringRecord {
    /// Unique record id, also the ledger key
    pub metering_id: String,
    /// Referenced site
    pub site_id: String,
    /// Interval start, epoch seconds (half-open window)
    pub time_interval_start: String,
    /// Interval end, epoch seconds
    pub time_interval_end: String,
    /// Series resolution (e.g. "PT30M")
    pub resolution: String,
    /// Ordered time series
    pub points: Vec<Point>,
}

impl LedgerAsset for MeteringRecord {
    fn asset_id(&self) -> &str {
        &self.metering_id
    }
}

/// Explicit query filter for metering records
///
/// The interval bounds express window overlap the way the selector
/// language can: `timeIntervalStart <= windowEnd` and
/// `timeIntervalEnd >= windowStart`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeteringFilter {
    pub site_id: Option<String>,
    /// Upper bound on `timeIntervalStart`
    pub interval_start_lte: Option<String>,
    /// Lower bound on `timeIntervalEnd`
    pub interval_end_gte: Option<String>,
}

impl MeteringFilter {
    /// Overlap filter for one site and a `[start, end)` window; an empty
    /// end leaves the window open above.
    pub fn overlapping(site_id: impl Into<String>, window_start: &str, window_end: &str) -> Self {
        Self {
            site_id: Some(site_id.into()),
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
        if let Some(v) = &self.site_id {
            selector = selector.eq("siteId", v.clone());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_filter_open_window() {
        let filter = MeteringFilter::overlapping("S1", "1000", "");
        assert!(filter.interval_start_lte.is_none());
        assert_eq!(filter.interval_end_gte.as_deref(), Some("1000"));
        assert_eq!(filter.to_selector().len(), 2);
    }
}
