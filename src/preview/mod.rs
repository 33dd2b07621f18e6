//! CanteenApps Preview Server
//!
//! Serves the dashboard assets over HTTP, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status with fragment source and version
//! - `GET /render/:page` - Server-side booted shell with `page` active
//! - everything else - the asset directory (`ServeDir`), or the embedded
//!   assets when the directory does not exist
//!
//! # Example
//!
//! ```rust,ignore
//! use canteen::config::Config;
//! use canteen::preview::{serve, PreviewState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = PreviewState::new(Config::load_default())?;
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{PreviewError, PreviewResult};
pub use state::PreviewState;

use axum::{http::HeaderValue, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Configured origins, or any origin when the list is empty
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new().allow_origin(origins).allow_methods(Any)
}

/// Build the preview router with all routes and middleware
pub fn build_router(state: PreviewState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::liveness))
        .route("/", get(routes::full_health));

    let asset_root = state.config.assets.root.clone();
    let cors = cors_layer(&state.config.preview.cors_origins);
    let shared_state = Arc::new(state);

    let router = Router::new()
        .nest("/health", health_routes)
        .route("/render/:page", get(routes::render_page));

    let router = if Path::new(&asset_root).is_dir() {
        router.fallback_service(ServeDir::new(asset_root))
    } else {
        router.fallback(routes::builtin_asset)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Start the preview server
pub async fn serve(state: PreviewState) -> Result<(), PreviewError> {
    let addr = state.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("CanteenApps preview listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("CanteenApps preview shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
