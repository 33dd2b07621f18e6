//! Preview Routes
//!
//! - GET /health/live - Liveness probe
//! - GET /health - Status with fragment source and version
//! - GET /render/:page - Dashboard booted server-side, that page active
//! - anything else - static assets

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Html,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::{PreviewError, PreviewResult};
use super::state::PreviewState;
use crate::app::{AppContext, CanteenApp};
use crate::config::{Config, UiConfig};
use crate::fragment::FragmentSource;
use crate::navigation::PageToken;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub source: String,
    pub pages: Vec<String>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn full_health(State(state): State<Arc<PreviewState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        source: state.source.describe(),
        pages: state.config.navigation.pages.clone(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /render/:page
///
/// Boots a fresh session with every delay removed and returns the
/// resulting document.
pub async fn render_page(
    State(state): State<Arc<PreviewState>>,
    Path(page): Path<String>,
) -> PreviewResult<Html<String>> {
    let token = PageToken::parse(&page).map_err(|e| PreviewError::Validation(e.to_string()))?;

    let config = Config {
        ui: UiConfig::instant(),
        ..(*state.config).clone()
    };
    let ctx = AppContext::new(config, &state.shell, state.source.clone())?;
    let mut app = CanteenApp::new(ctx);
    let report = app.boot(&token.href()).await?;

    if report.page.is_none() {
        return Err(PreviewError::NotFound(format!("page {}", token)));
    }

    let html = app.render().await;
    app.shutdown().await;
    Ok(Html(html))
}

/// Assets served from the fragment source when there is no asset
/// directory to serve from
pub async fn builtin_asset(
    State(state): State<Arc<PreviewState>>,
    uri: Uri,
) -> PreviewResult<Html<String>> {
    let path = uri.path().trim_start_matches('/');
    if path.is_empty() || path == "index.html" {
        return Ok(Html(state.shell.to_string()));
    }
    let html = state.source.fetch(path).await?;
    Ok(Html(html))
}
