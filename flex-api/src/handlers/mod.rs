//! Asset Handlers
//!
//! One handler object per asset type. A handler receives the operation
//! token, the JSON argument array and the authenticated caller, consults
//! the authorization resolver before or after the repository access
//! (policy differs per asset type) and returns the operation's payload.

mod bid;
mod metering;
mod order;
mod registry;
mod schedule;
mod site;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use flex_core::Organization;

use crate::error::{ApiError, ApiResult};

pub use bid::BidHandler;
pub use metering::MeteringHandler;
pub use order::OrderHandler;
pub use registry::{AggregatorHandler, EndpointHandler};
pub use schedule::ScheduleHandler;
pub use site::SiteHandler;

/// A dispatchable handler for one asset type
#[async_trait]
pub trait AssetHandler: Send + Sync {
    /// Asset-type token this handler is registered under
    fn name(&self) -> &'static str;

    /// Execute one named operation
    async fn handle(
        &self,
        operation: &str,
        args: &[Value],
        caller: &Organization,
    ) -> ApiResult<Option<Value>>;
}

/// Deserialize a required positional argument
pub(crate) fn required_arg<T: DeserializeOwned>(
    args: &[Value],
    index: usize,
    what: &str,
) -> ApiResult<T> {
    let value = args
        .get(index)
        .ok_or_else(|| ApiError::bad_request(format!("missing argument {}: {}", index, what)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| ApiError::bad_request(format!("invalid {}: {}", what, e)))
}

/// Deserialize an optional trailing filter argument; absent means
/// "match everything of the type".
pub(crate) fn optional_filter<T: DeserializeOwned + Default>(
    args: &[Value],
    index: usize,
) -> ApiResult<T> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ApiError::bad_request(format!("invalid filter: {}", e))),
    }
}

/// Remove the store-injected type tag before a document leaves the API,
/// so a get returns exactly what create persisted.
pub(crate) fn strip_tag(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        obj.remove(flex_core::ASSET_TYPE_FIELD);
    }
    doc
}

/// Strip the type tag from a whole result set
pub(crate) fn strip_tags(docs: Vec<Value>) -> Vec<Value> {
    docs.into_iter().map(strip_tag).collect()
}
