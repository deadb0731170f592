use crate::config::MonitorConfig;
use crate::errors::ProxyError;
use reqwest;
use std::time::Duration;
use tracing;

/// Client for a live input's public lifecycle endpoint
/// (`{customer base}/{input_id}/lifecycle`).
#[derive(Clone)]
pub struct LifecycleClient {
    client: reqwest::Client,
    base_url: String,
    input_id: String,
    api_token: String,
}

impl LifecycleClient {
    /// Creates a new `LifecycleClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Source of the customer base URL, input id, token and timeout.
    pub fn new(config: &MonitorConfig) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| {
                ProxyError::TransportFault(format!("Failed to create lifecycle client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.lifecycle_base_url.clone(),
            input_id: config.input_id.clone(),
            api_token: config.cloudflare_api_token.clone(),
        })
    }

    pub fn lifecycle_url(&self) -> String {
        format!("{}/{}/lifecycle", self.base_url, self.input_id)
    }

    /// Asks whether the live input is currently receiving video.
    ///
    /// Only HTTP 200 counts as an answer. A missing or non-boolean `live`
    /// field reads as not live.
    ///
    /// # Returns
    ///
    /// * `Result<bool, ProxyError>` - `true` while the stream is live.
    pub async fn fetch_live(&self) -> Result<bool, ProxyError> {
        let url = self.lifecycle_url();
        tracing::debug!("Polling stream lifecycle: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("Lifecycle endpoint returned {}: {}", status, error_text);
            return Err(ProxyError::UpstreamRejection(status));
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;

        Ok(body
            .get("live")
            .and_then(|live| live.as_bool())
            .unwrap_or(false))
    }
}
