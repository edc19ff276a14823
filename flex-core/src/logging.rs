//! Logging Standards and Conventions
//!
//! Logging conventions shared by every FlexLedger crate. All modules
//! should follow these standards for consistent log output.
//!
//! # Log Levels
//!
//! | Level | Usage | Examples |
//! |-------|-------|----------|
//! | ERROR | Unrecoverable errors | Store backend failure |
//! | WARN  | Degraded operation | Aggregation step defaulted a field |
//! | INFO  | Significant state changes | Asset created or updated |
//! | DEBUG | Detailed operation flow | Reads, chain hops, list filtering |
//!
//! # Structured Logging Fields
//!
//! Always use structured fields for key information:
//! - `asset_id`: the ledger key being acted on
//! - `operation`: dispatch operation name
//! - `caller`: caller organization id
//! - `role`: caller organization role
//! - `count`: item count for list results
//!
//! ```ignore
//! use tracing::info;
//!
//! info!(asset_id = %bid.bid_id, operation = "createBid", "Bid created");
//! ```

use serde::{Deserialize, Serialize};

/// Log level enumeration matching tracing levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
