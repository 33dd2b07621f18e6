//! Fragment Loader
//!
//! Fetches fragments and injects them into mount points. A load never
//! fails outward: errors are logged and reported in the outcome, the
//! mount point is left untouched, and other loads carry on.
//!
//! Each load takes a ticket for its mount point. When two loads race for
//! the same mount, only the one holding the newest ticket may write; an
//! older fetch that resolves late is discarded.

use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::source::FragmentSource;
use crate::document::SharedDocument;

/// Where a fragment goes and where it comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRequest {
    pub mount: String,
    pub locator: String,
}

impl FragmentRequest {
    pub fn new(mount: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            mount: mount.into(),
            locator: locator.into(),
        }
    }

    /// Shell include: `includes/<name>.html` into `#<name>Container`
    pub fn include(name: &str) -> Self {
        Self::new(format!("{}Container", name), format!("includes/{}.html", name))
    }

    /// Page body: `pages/<token>.html` into `#<token>Page`
    pub fn page(token: &str) -> Self {
        Self::new(format!("{}Page", token), format!("pages/{}.html", token))
    }
}

/// What happened to a single load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Markup injected into the mount point
    Loaded { bytes: usize },
    /// Mount point does not exist; nothing fetched or written
    MountMissing,
    /// Fetch failed; mount point left unchanged
    Failed { reason: String },
    /// A newer load for the same mount point took precedence
    Superseded,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Outcomes of a batch of loads, in request order
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub entries: Vec<(FragmentRequest, LoadOutcome)>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_loaded()).count()
    }

    /// Requests whose fetch failed
    pub fn failures(&self) -> Vec<&FragmentRequest> {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, LoadOutcome::Failed { .. }))
            .map(|(r, _)| r)
            .collect()
    }

    pub fn outcome(&self, mount: &str) -> Option<&LoadOutcome> {
        self.entries
            .iter()
            .find(|(r, _)| r.mount == mount)
            .map(|(_, o)| o)
    }
}

/// Injects fetched fragments into the shared document
#[derive(Clone)]
pub struct FragmentLoader {
    source: Arc<dyn FragmentSource>,
    document: SharedDocument,
    sequence: Arc<AtomicU64>,
    latest: Arc<Mutex<HashMap<String, u64>>>,
}

impl FragmentLoader {
    pub fn new(source: Arc<dyn FragmentSource>, document: SharedDocument) -> Self {
        Self {
            source,
            document,
            sequence: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn source(&self) -> &Arc<dyn FragmentSource> {
        &self.source
    }

    /// Claim the newest ticket for a mount point
    async fn issue_ticket(&self, mount: &str) -> u64 {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest.lock().await.insert(mount.to_string(), ticket);
        ticket
    }

    async fn is_current(&self, mount: &str, ticket: u64) -> bool {
        self.latest.lock().await.get(mount) == Some(&ticket)
    }

    /// Load one fragment
    pub async fn load(&self, request: &FragmentRequest) -> LoadOutcome {
        if self.document.read().await.element_by_id(&request.mount).is_none() {
            tracing::debug!(mount = %request.mount, "Mount point missing, skipping fragment");
            return LoadOutcome::MountMissing;
        }

        let ticket = self.issue_ticket(&request.mount).await;

        let html = match self.source.fetch(&request.locator).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    locator = %request.locator,
                    mount = %request.mount,
                    error = %e,
                    "Skip load"
                );
                return LoadOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        // Ticket check and write happen under the document lock
        let mut doc = self.document.write().await;
        if !self.is_current(&request.mount, ticket).await {
            tracing::debug!(
                locator = %request.locator,
                mount = %request.mount,
                ticket,
                "Discarding stale fragment"
            );
            return LoadOutcome::Superseded;
        }

        match doc.element_by_id(&request.mount) {
            Some(mount) => {
                doc.set_inner_html(mount, &html);
                tracing::debug!(locator = %request.locator, mount = %request.mount, "Fragment loaded");
                LoadOutcome::Loaded { bytes: html.len() }
            }
            None => LoadOutcome::MountMissing,
        }
    }

    /// Load many fragments concurrently; each outcome is independent
    pub async fn load_all(&self, requests: &[FragmentRequest]) -> LoadReport {
        let outcomes = join_all(requests.iter().map(|r| self.load(r))).await;
        LoadReport {
            entries: requests.iter().cloned().zip(outcomes).collect(),
        }
    }
}
