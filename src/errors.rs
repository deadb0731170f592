use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

/// Body message for an upstream call that answered with a non-success status.
pub const UPSTREAM_REJECTION_MESSAGE: &str = "Failed to fetch stream status from Cloudflare.";

/// Body message for a call that never produced a usable upstream answer.
pub const TRANSPORT_FAULT_MESSAGE: &str = "An error occurred while fetching the stream status.";

/// Failure outcomes of a stream status lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Cloudflare answered, but not with a 2xx. Carries the upstream status.
    UpstreamRejection(StatusCode),
    /// Network, DNS, timeout, or body parse failure. Carries the fault's message.
    TransportFault(String),
    /// The inbound request could not be read (e.g. its body exceeds the cap).
    /// Raised before any upstream call.
    RequestRejected(StatusCode, String),
}

/// JSON shape of every error response. `details` is only present for transport faults.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::UpstreamRejection(status) => {
                write!(f, "Cloudflare returned {}", status)
            }
            ProxyError::TransportFault(msg) => write!(f, "Transport fault: {}", msg),
            ProxyError::RequestRejected(status, msg) => {
                write!(f, "Request rejected ({}): {}", status, msg)
            }
        }
    }
}

impl std::error::Error for ProxyError {}

impl IntoResponse for ProxyError {
    /// Maps the failure to its status code and JSON body.
    ///
    /// Upstream rejections reuse the upstream status and never include the
    /// upstream body. Transport faults are always HTTP 500 with the fault's
    /// message under `details`.
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProxyError::UpstreamRejection(status) => {
                tracing::warn!("Cloudflare rejected stream status request: {}", status);
                (
                    status,
                    ErrorBody {
                        error: UPSTREAM_REJECTION_MESSAGE.to_string(),
                        details: None,
                    },
                )
            }
            ProxyError::TransportFault(msg) => {
                tracing::error!("Stream status lookup failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: TRANSPORT_FAULT_MESSAGE.to_string(),
                        details: Some(msg),
                    },
                )
            }
            ProxyError::RequestRejected(status, msg) => {
                tracing::warn!("Inbound request rejected: {}", msg);
                (
                    status,
                    ErrorBody {
                        error: msg,
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::TransportFault(err.to_string())
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::TransportFault(err.to_string())
    }
}
