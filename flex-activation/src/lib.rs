//! FlexLedger Activation Aggregation
//!
//! Rebuilds the consolidated [`Activation`](flex_core::Activation) view
//! for activation orders: a time-windowed join across orders, sites,
//! aggregators, endpoints, schedules, bids and the voltage-matched
//! metering collection, with a fixed one-hour tolerance margin and
//! 1-based point re-indexing.
//!
//! This is a read path feeding dashboards, not settlement: a missing
//! site, aggregator, endpoint or bid degrades the output (defaults and
//! omissions) instead of failing. Only store I/O failures propagate.

pub mod aggregator;
pub mod error;

pub use aggregator::{ActivationAggregator, ACTIVATION_MARGIN_SECS};
pub use error::{ActivationError, ActivationResult};
