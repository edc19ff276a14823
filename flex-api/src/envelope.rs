//! Response Envelope
//!
//! What goes back to the platform for every dispatched call: a JSON
//! payload on success (omitted when the operation returns nothing), a
//! textual message on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Dispatch response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// Successful call, with or without a return value
    pub fn ok(payload: Option<Value>) -> Self {
        Self {
            success: true,
            payload,
            message: None,
        }
    }

    /// Failed call with its textual message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_without_payload_omits_fields() {
        let json = serde_json::to_value(Envelope::ok(None)).unwrap();
        assert_eq!(json, json!({"success": true}));
    }

    #[test]
    fn test_failure_carries_message() {
        let json = serde_json::to_value(Envelope::failure("S1 already exists.")).unwrap();
        assert_eq!(json, json!({"success": false, "message": "S1 already exists."}));
    }
}
