use std::sync::Arc;
use stream_status_proxy::config::Config;
use stream_status_proxy::handlers::AppState;
use stream_status_proxy::routes::build_router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the Cloudflare client
/// and router, then serves until the process is stopped.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stream_status_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let port = config.port;

    let app_state = Arc::new(
        AppState::new(config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Cloudflare client: {}", e))?,
    );
    tracing::info!("✓ Cloudflare Stream client initialized");

    let app = build_router(app_state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
