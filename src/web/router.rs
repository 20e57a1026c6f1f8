//! Router configuration for the web front end.

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::cors::create_cors_layer;
use super::ws::{chat_ws_handler, ChatWsState};

/// Create the main router.
pub fn create_router(state: Arc<ChatWsState>, config: &WebConfig) -> Router {
    let mut router = Router::new()
        .route("/ws", get(chat_ws_handler))
        .with_state(state)
        .merge(create_health_router());

    if config.serve_static {
        match create_static_router(&config.static_path) {
            Some(static_router) => router = router.merge(static_router),
            None => tracing::warn!(
                "Static path {} does not exist, static files are disabled",
                config.static_path
            ),
        }
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&config.cors_origins)),
    )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving files from `static_path`.
///
/// Unknown paths fall back to `index.html`. Returns None if the directory
/// does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        return None;
    }

    let serve_dir = ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dir.join("index.html")));
    Some(Router::new().fallback_service(serve_dir))
}
