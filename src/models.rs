use crate::errors::ProxyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status reported when Cloudflare's answer carries no usable `result.status`.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Successful proxy response: `{"status": ...}`.
///
/// `status` is relayed as Cloudflare sent it, so it may be a string or a
/// structured value such as `{"current": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Value,
}

impl StatusResponse {
    /// Reduces a live input body to its status.
    ///
    /// A `null` body has no `result` to look into and is reported as a
    /// transport fault rather than as an unknown status.
    pub fn from_live_input(body: &Value) -> Result<Self, ProxyError> {
        if body.is_null() {
            return Err(ProxyError::TransportFault(
                "Cloudflare returned a null response body".to_string(),
            ));
        }
        Ok(Self {
            status: extract_stream_status(body),
        })
    }
}

/// Liveness payload for `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Pulls `result.status` out of a live input response.
///
/// Both `result` and `status` must be truthy: `null`, `false`, `0` and `""`
/// count as absent, and absence yields [`UNKNOWN_STATUS`]. Any other value is
/// returned untouched.
pub fn extract_stream_status(body: &Value) -> Value {
    body.get("result")
        .filter(|r| is_truthy(r))
        .and_then(|r| r.get("status"))
        .filter(|s| is_truthy(s))
        .cloned()
        .unwrap_or_else(|| Value::String(UNKNOWN_STATUS.to_string()))
}

/// Truthiness of a JSON value as a JavaScript condition would see it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
