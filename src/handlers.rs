use crate::cloudflare_client::CloudflareStreamClient;
use crate::config::Config;
use crate::errors::ProxyError;
use crate::models::{HealthResponse, StatusResponse};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the Cloudflare Stream API.
    pub cloudflare_client: CloudflareStreamClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProxyError> {
        let cloudflare_client = CloudflareStreamClient::new(&config)?;
        Ok(Self {
            config,
            cloudflare_client,
        })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<HealthResponse>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service: "stream-status-proxy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Any method, any path except `GET /health`.
///
/// Looks up the configured live input on Cloudflare and answers with its
/// status. The inbound request only triggers the lookup; its method, path
/// and body content are ignored. The body is still drained so the router's
/// size cap applies, and a body over the cap is refused before Cloudflare is
/// contacted.
///
/// # Returns
///
/// * `Result<Json<StatusResponse>, ProxyError>` - `{"status": ...}` or the mapped failure.
pub async fn stream_status(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StatusResponse>, ProxyError> {
    if let Err(rejection) = body {
        return Err(ProxyError::RequestRejected(
            rejection.status(),
            rejection.body_text(),
        ));
    }

    tracing::debug!(
        "Stream status requested for live input {}",
        state.config.live_input_id
    );

    let status = state.cloudflare_client.fetch_stream_status().await?;
    Ok(Json(status))
}
