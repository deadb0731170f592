use crate::config::Config;
use crate::errors::ProxyError;
use crate::models::StatusResponse;
use reqwest;
use std::time::Duration;
use tracing;

/// Client for the Cloudflare Stream live input endpoint.
///
/// Holds the identifiers and credentials of a single live input, so every
/// call targets the same upstream URL.
#[derive(Clone)]
pub struct CloudflareStreamClient {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    live_input_id: String,
    email: String,
    api_key: String,
}

impl CloudflareStreamClient {
    /// Creates a new `CloudflareStreamClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - Source of the base URL, identifiers, credentials and timeout.
    pub fn new(config: &Config) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| {
                ProxyError::TransportFault(format!("Failed to create Cloudflare client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.cloudflare_api_base_url.clone(),
            account_id: config.account_id.clone(),
            live_input_id: config.live_input_id.clone(),
            email: config.cloudflare_email.clone(),
            api_key: config.cloudflare_api_key.clone(),
        })
    }

    /// URL of the live input resource. Identifiers are substituted verbatim.
    pub fn live_input_url(&self) -> String {
        live_input_url(&self.base_url, &self.account_id, &self.live_input_id)
    }

    /// Fetches the live input and reduces it to its status.
    ///
    /// Issues exactly one GET. A non-2xx answer becomes
    /// [`ProxyError::UpstreamRejection`]; a failed send, timeout, or
    /// unparseable or `null` body becomes [`ProxyError::TransportFault`].
    ///
    /// # Returns
    ///
    /// * `Result<StatusResponse, ProxyError>` - The stream status, `"unknown"` when absent.
    pub async fn fetch_stream_status(&self) -> Result<StatusResponse, ProxyError> {
        let url = self.live_input_url();
        tracing::info!("Fetching live input status from Cloudflare: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            // Dropping the response releases the connection without reading the body
            return Err(ProxyError::UpstreamRejection(response.status()));
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;
        let status = StatusResponse::from_live_input(&body)?;

        tracing::info!("Live input {} status: {}", self.live_input_id, status.status);
        Ok(status)
    }
}

/// Formats `{base}/accounts/{account}/stream/live_inputs/{input}`.
pub fn live_input_url(base_url: &str, account_id: &str, live_input_id: &str) -> String {
    format!(
        "{}/accounts/{}/stream/live_inputs/{}",
        base_url, account_id, live_input_id
    )
}
