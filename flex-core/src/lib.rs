//! FlexLedger Core - Energy Market Domain Model
//!
//! Shared domain model for the FlexLedger energy-market document store.
//! This crate is pure data and pure functions; all I/O lives in the
//! layers above it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 flex-api                     │
//! │   (handlers, dispatch, response envelope)    │
//! ├──────────────────────┬──────────────────────┤
//! │      flex-authz      │    flex-activation    │
//! │ (ownership chains,   │ (consolidated view    │
//! │  access policies)    │  aggregation)         │
//! ├──────────────────────┴──────────────────────┤
//! │                flex-store                    │
//! │   (AssetStore, selector query, repository)   │
//! ├─────────────────────────────────────────────┤
//! │            flex-core (this crate)            │
//! │  (assets, roles, filters, window clipping)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Core Types
//!
//! - [`Organization`]: authenticated caller context (role + identity)
//! - [`Site`], [`Aggregator`], [`Endpoint`]: registry assets
//! - [`MeteringRecord`], [`Bid`], [`Schedule`]: time-series documents
//! - [`OrderBySiteActivationDocument`]: per-site activation order with
//!   its embedded lifecycle log
//! - [`Activation`]: the derived, never-persisted consolidated view
//! - [`Selector`]: the ledger rich-query model (field equality, range,
//!   not-null), shared by every store backend

pub mod logging;
pub mod selector;
pub mod types;
pub mod window;

pub use selector::{Condition, Selector};
pub use types::*;
