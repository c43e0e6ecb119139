//! HTTP surface: the upload form, its result page and a JSON endpoint.

pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};

use crate::config::Config;
use crate::quiz::SharedGenerator;

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index).post(handlers::generate_form))
        .route("/api/mcqs", post(handlers::generate_json))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Binds `HOST:PORT` and serves until Ctrl-C.
pub async fn serve(config: Arc<Config>, generator: SharedGenerator) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    let app = router(AppState { generator, config });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C, serving until killed: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
