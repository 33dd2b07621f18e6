//! CanteenApps
//!
//! Boots the dashboard against the configured fragment source, navigates
//! to the initial page and logs a summary.
//!
//! The initial location comes from the first argument or `CANTEEN_HASH`
//! (default: the configured default page).

use canteen::app::{AppContext, CanteenApp};
use canteen::config::Config;
use canteen::fragment::FragmentSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    canteen::logging::init(&config.logging, "");

    tracing::info!("CanteenApps v{}", env!("CARGO_PKG_VERSION"));

    let hash = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CANTEEN_HASH").ok())
        .unwrap_or_else(|| format!("#{}", config.navigation.default_page));

    let source = config.assets.fragment_source()?;
    let shell = config.assets.shell_html();
    tracing::info!("Fragment source: {}", source.describe());

    let ctx = AppContext::new(config, &shell, source)?;
    let mut app = CanteenApp::new(ctx);
    let report = app.boot(&hash).await?;

    tracing::info!(
        "Fragments loaded: {} ({} failed)",
        report.fragments.loaded(),
        report.fragments.failures().len()
    );
    tracing::info!(
        "Components initialized: {:?}, unmounted: {:?}",
        report.components.initialized,
        report.components.unmounted
    );
    for (name, error) in &report.components.failed {
        tracing::warn!("Component {} failed: {}", name, error);
    }
    match &report.page {
        Some(page) => tracing::info!("Active page: {}", page),
        None => tracing::warn!("No page matches {}", hash),
    }

    for message in app.context().toasts.messages().await {
        tracing::info!("Toast: {}", message);
    }

    app.shutdown().await;
    tracing::info!("CanteenApps shutdown complete");
    Ok(())
}
