use crate::handlers::{self, AppState};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Inbound bodies are never used, so keep the cap small.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Builds the application router.
///
/// `GET /health` answers locally. Every other method on `/health`, and every
/// method on any other path, falls through to the stream status proxy.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::stream_status),
        )
        .fallback(handlers::stream_status)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
