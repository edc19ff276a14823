//! FlexLedger API Layer
//!
//! The operation surface the surrounding ledger platform dispatches
//! into: one handler object per asset type, a dispatch table resolving
//! `"<AssetType>.<operation>"` tokens, and the response envelope the
//! platform returns to callers. Transport (RPC framing, endorsement,
//! consensus) lives outside this crate.
//!
//! # Modules
//!
//! - [`handlers`] - one handler per asset type
//! - [`dispatch`] - the dispatch table, built once at startup
//! - [`envelope`] - success/failure response envelope
//! - [`state`] - shared handler state (repository, authorization,
//!   activation aggregation)
//! - [`telemetry`] - tracing subscriber setup

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod state;
pub mod telemetry;

pub use dispatch::Dispatcher;
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
