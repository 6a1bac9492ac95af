//! Caller-facing result envelope and upstream payload unwrapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Uniform envelope returned to callers by every gateway endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Row count, populated when `data` is an array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl ApiResponse {
    /// Success envelope around a payload.
    pub fn ok(data: Value) -> Self {
        let count = data.as_array().map(|rows| rows.len() as u64);
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            count,
        }
    }

    /// Success envelope with an operator-facing message.
    pub fn ok_with(message: impl Into<String>, data: Value) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// Failure envelope for an error, paired with
    /// [`GatewayError::status`] on the HTTP surface.
    pub fn failure(error: &GatewayError) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(error.to_string()),
            error: Some(error.to_string()),
            count: None,
        }
    }
}

/// Unwraps one level of `data` nesting from a successful upstream payload.
///
/// The engine sometimes answers `{"success": true, "data": ...}` and
/// sometimes the bare payload; both shapes are accepted and at most one
/// level is removed.
pub(crate) fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_exactly_one_level() {
        let nested = json!({"success": true, "data": {"data": [1, 2]}});
        assert_eq!(unwrap_data(nested), json!({"data": [1, 2]}));
    }

    #[test]
    fn passes_bare_payloads_through() {
        let rows = json!([{"id": 1}]);
        assert_eq!(unwrap_data(rows.clone()), rows);
        assert_eq!(unwrap_data(json!({"id": 7})), json!({"id": 7}));
    }

    #[test]
    fn count_tracks_array_payloads() {
        let response = ApiResponse::ok(json!([1, 2, 3]));
        assert_eq!(response.count, Some(3));
        assert!(ApiResponse::ok(json!({"id": 1})).count.is_none());
    }
}
