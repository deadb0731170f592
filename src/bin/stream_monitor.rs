use std::time::Duration;
use stream_status_proxy::config::MonitorConfig;
use stream_status_proxy::lifecycle_client::LifecycleClient;
use stream_status_proxy::monitor::{LoggingEvents, StreamMonitor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Polls the live input's lifecycle endpoint and logs live/offline
/// transitions until interrupted.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stream_status_proxy=info,stream_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MonitorConfig::from_env()?;
    let client = LifecycleClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize lifecycle client: {}", e))?;
    let monitor = StreamMonitor::from_config(&config);

    tracing::info!("Monitoring {}", client.lifecycle_url());

    tokio::select! {
        _ = monitor.run(&client, &LoggingEvents, Duration::from_secs(config.poll_interval_secs)) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Monitor interrupted by user");
        }
    }

    Ok(())
}
