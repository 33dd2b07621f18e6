//! CanteenApps Preview Server
//!
//! Run with: cargo run --bin canteen-preview
//!
//! # Configuration
//!
//! Config file (see `canteen-cli config`) plus environment variables:
//! - `CANTEEN_PREVIEW_HOST`: Host to bind to (default: 127.0.0.1)
//! - `CANTEEN_PREVIEW_PORT`: Port to listen on (default: 8084)
//! - `CANTEEN_ASSETS_DIR`: Asset directory to serve (default: ./assets)
//! - `CANTEEN_ASSETS_URL`: Fetch fragments for `/render` over HTTP instead
//! - `RUST_LOG`: Log filter (default: canteen=info,tower_http=debug)

use canteen::config::Config;
use canteen::fragment::FragmentSource;
use canteen::preview::{serve, PreviewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    canteen::logging::init(&config.logging, "tower_http=debug");

    tracing::info!(
        "Starting CanteenApps preview server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Asset root: {}", config.assets.root);

    let state = PreviewState::new(config)?;
    tracing::info!("Rendering fragments from {}", state.source.describe());

    serve(state).await?;

    tracing::info!("CanteenApps preview server stopped");
    Ok(())
}
