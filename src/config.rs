use serde::Deserialize;

/// Default Cloudflare API root used when `CLOUDFLARE_API_BASE_URL` is unset.
pub const DEFAULT_CLOUDFLARE_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub account_id: String,
    pub live_input_id: String,
    pub cloudflare_email: String,
    pub cloudflare_api_key: String,
    pub cloudflare_api_base_url: String,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            account_id: required_var("ACCOUNT_ID")?,
            live_input_id: required_var("LIVE_INPUT_ID")?,
            cloudflare_email: required_var("CLOUDFLARE_EMAIL")?,
            cloudflare_api_key: required_var("CLOUDFLARE_API_KEY")?,
            cloudflare_api_base_url: std::env::var("CLOUDFLARE_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| normalize_base_url(&url))
                .unwrap_or_else(|| Ok(DEFAULT_CLOUDFLARE_API_BASE_URL.to_string()))?,
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS", 30)?,
        };

        // Identifiers are fine to log, credentials are not
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Cloudflare API base URL: {}", config.cloudflare_api_base_url);
        tracing::debug!("Account ID: {}", config.account_id);
        tracing::debug!("Live input ID: {}", config.live_input_id);
        tracing::debug!("Upstream timeout: {}s", config.upstream_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Configuration for the `stream_monitor` binary, which polls the live
/// input's lifecycle endpoint instead of the management API.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub cloudflare_api_token: String,
    pub customer_code: String,
    pub input_id: String,
    pub lifecycle_base_url: String,
    pub poll_interval_secs: u64,
    pub disconnect_threshold: u32,
    pub error_threshold_secs: u64,
    pub upstream_timeout_secs: u64,
}

impl MonitorConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let customer_code = required_var("CUSTOMER_CODE")?;
        let config = Self {
            cloudflare_api_token: required_var("CLOUDFLARE_API_TOKEN")?,
            input_id: required_var("INPUT_ID")?,
            lifecycle_base_url: std::env::var("STREAM_LIFECYCLE_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| normalize_base_url(&url))
                .unwrap_or_else(|| Ok(default_lifecycle_base_url(&customer_code)))?,
            customer_code,
            poll_interval_secs: parse_var("POLL_INTERVAL_SECS", 5)?,
            disconnect_threshold: parse_var("DISCONNECT_THRESHOLD", 3)?,
            error_threshold_secs: parse_var("ERROR_THRESHOLD_SECS", 30 * 60)?,
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS", 30)?,
        };

        // tokio intervals panic on a zero period
        if config.poll_interval_secs == 0 {
            anyhow::bail!("POLL_INTERVAL_SECS must be greater than zero");
        }

        tracing::info!("Monitor configuration loaded successfully");
        tracing::debug!("Lifecycle base URL: {}", config.lifecycle_base_url);
        tracing::debug!("Input ID: {}", config.input_id);
        tracing::debug!(
            "Poll every {}s, offline after {} misses, report errors after {}s",
            config.poll_interval_secs,
            config.disconnect_threshold,
            config.error_threshold_secs
        );

        Ok(config)
    }
}

/// `https://customer-{code}.cloudflarestream.com`
pub fn default_lifecycle_base_url(customer_code: &str) -> String {
    format!("https://customer-{}.cloudflarestream.com", customer_code)
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number", name)),
        _ => Ok(default),
    }
}

fn required_var(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    Ok(value)
}

/// Checks the scheme and strips trailing slashes so path templating never
/// produces `//accounts`.
fn normalize_base_url(url: &str) -> anyhow::Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("CLOUDFLARE_API_BASE_URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}
