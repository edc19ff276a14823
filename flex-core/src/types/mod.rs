//! FlexLedger Asset Types
//!
//! One file per entity family. All persisted assets serialize with
//! camelCase field names because they face the ledger's JSON document
//! store and its selector language filters on serialized names.

mod activation;
mod aggregator;
mod asset;
mod bid;
mod endpoint;
mod metering;
mod order;
mod organization;
mod point;
mod schedule;
mod site;

pub use activation::*;
pub use aggregator::*;
pub use asset::*;
pub use bid::*;
pub use endpoint::*;
pub use metering::*;
pub use order::*;
pub use organization::*;
pub use point::*;
pub use schedule::*;
pub use site::*;
