//! FlexLedger Authorization Layer
//!
//! There is no ACL table anywhere in this system. Whether a caller may
//! act on a document is *computed* per call from two ingredients:
//!
//! - the caller's organization role (TSO / DSO / BSP / Producer), and
//! - indirect ownership, resolved by walking reference chains between
//!   assets (a metering record belongs to a Site, the Site is wired to
//!   an Aggregator, the Aggregator belongs to a BSP, ...).
//!
//! A chain that cannot be fully resolved - a missing document, a missing
//! field, a mistagged document - yields "no owner", which every policy
//! treats as deny. Fail closed, never error.
//!
//! # Components
//!
//! - [`Chain`] / [`OwnershipResolver`] - reference-chain descriptions and
//!   their sequential point-read evaluation
//! - [`Decision`] - allow, or deny with a human-readable cause
//! - [`AuthorizationResolver`] - the per-asset-type, per-operation,
//!   per-role policy tables, plus list post-filtering

pub mod chain;
pub mod decision;
pub mod error;
pub mod policy;

pub use chain::{Chain, Hop, OwnershipResolver};
pub use decision::Decision;
pub use error::{AuthzError, AuthzResult};
pub use policy::{AuthorizationResolver, Operation};
