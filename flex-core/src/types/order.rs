//! Activation Orders
//!
//! An order targets one site and accumulates lifecycle events in its
//! embedded log: the reception entry opens the activation window, an end
//! entry (if any) closes it, technical-constraint entries annotate it.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use super::{LedgerAsset, OrganizationRole};
use crate::selector::Selector;

/// Lifecycle event kind attached to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogOrderKind {
    /// Order received, activation window opens
    Reception,
    /// Activation ended, window closes
    End,
    /// Technical constraint reported by the activating party
    TechnicalConstraint,
}

/// One timestamped lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOrder {
    /// Event kind
    pub kind: LogOrderKind,
    /// Organization id of the event creator
    pub creator: String,
    /// Role the creator acted under
    pub creator_role: OrganizationRole,
    /// Event time, epoch seconds
    pub timestamp: String,
    /// Free-text annotation
    #[serde(default)]
    pub message: String,
}

/// Per-site activation order with its embedded lifecycle log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBySiteActivationDocument {
    /// Unique order id, also the ledger key
    pub order_id: String,
    /// Referenced site
    pub site_id: String,
    /// Ordered activation value
    pub order_value: String,
    /// Creation time, epoch seconds
    pub created_timestamp: String,
    /// IANA timezone the order was issued in
    pub time_zone: String,
    /// Lifecycle log, append-only
    pub log_orders: Vec<LogOrder>,
}

impl LedgerAsset for OrderBySiteActivationDocument {
    fn asset_id(&self) -> &str {
        &self.order_id
    }
}

impl OrderBySiteActivationDocument {
    /// First log entry of the given kind
    pub fn log_entry(&self, kind: LogOrderKind) -> Option<&LogOrder> {
        self.log_orders.iter().find(|l| l.kind == kind)
    }

    /// Activation window start: the reception entry's timestamp, or the
    /// empty string when no reception was logged yet.
    pub fn window_start(&self) -> String {
        self.log_entry(LogOrderKind::Reception)
            .map(|l| l.timestamp.clone())
            .unwrap_or_default()
    }

    /// Activation window end: the end entry's timestamp, or the empty
    /// string for a still-open window.
    pub fn window_end(&self) -> String {
        self.log_entry(LogOrderKind::End)
            .map(|l| l.timestamp.clone())
            .unwrap_or_default()
    }

    fn created_in_zone(&self) -> Option<chrono::DateTime<chrono_tz::Tz>> {
        let epoch = crate::window::parse_epoch(&self.created_timestamp)?;
        let tz: chrono_tz::Tz = self.time_zone.parse().ok()?;
        tz.timestamp_opt(epoch, 0).single()
    }

    /// Creation date rendered as a short date in the order's timezone
    pub fn created_date_short(&self) -> String {
        self.created_in_zone()
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Creation time rendered as a short time in the order's timezone
    pub fn created_time_short(&self) -> String {
        self.created_in_zone()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Explicit query filter for orders
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFilter {
    pub site_id: Option<String>,
}

impl OrderFilter {
    pub fn to_selector(&self) -> Selector {
        let mut selector = Selector::new();
        if let Some(v) = &self.site_id {
            selector = selector.eq("siteId", v.clone());
        }
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_with_logs(logs: Vec<LogOrder>) -> OrderBySiteActivationDocument {
        OrderBySiteActivationDocument {
            order_id: "O1".to_string(),
            site_id: "S1".to_string(),
            order_value: "12.5".to_string(),
            created_timestamp: "1700000000".to_string(),
            time_zone: "Europe/Madrid".to_string(),
            log_orders: logs,
        }
    }

    fn log(kind: LogOrderKind, timestamp: &str) -> LogOrder {
        LogOrder {
            kind,
            creator: "tso-1".to_string(),
            creator_role: OrganizationRole::Tso,
            timestamp: timestamp.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_window_from_logs() {
        let order = order_with_logs(vec![
            log(LogOrderKind::Reception, "1000"),
            log(LogOrderKind::End, "2000"),
        ]);
        assert_eq!(order.window_start(), "1000");
        assert_eq!(order.window_end(), "2000");
    }

    #[test]
    fn test_open_window_has_empty_end() {
        let order = order_with_logs(vec![log(LogOrderKind::Reception, "1000")]);
        assert_eq!(order.window_start(), "1000");
        assert_eq!(order.window_end(), "");
    }

    #[test]
    fn test_created_rendering() {
        let order = order_with_logs(vec![]);
        // 2023-11-14T22:13:20Z is 23:13 in Europe/Madrid (CET, UTC+1)
        assert_eq!(order.created_date_short(), "14/11/2023");
        assert_eq!(order.created_time_short(), "23:13");
    }

    #[test]
    fn test_created_rendering_degrades() {
        let mut order = order_with_logs(vec![]);
        order.time_zone = "Mars/Olympus".to_string();
        assert_eq!(order.created_date_short(), "-");
    }
}
