//! Navigation Controller
//!
//! Keeps the "current page" token, mirrors it in the URL fragment and
//! applies it to the document: every `.page` container is deactivated and
//! hidden, the target `<token>Page` is revealed, and after a short
//! transition delay it is marked active. The matching `.menu-item` gets
//! the highlight classes.
//!
//! A navigation runs in two steps, [`NavigationController::begin`] and
//! [`NavigationController::complete`], so that the delayed activation can
//! be checked against the navigation generation. If another navigation
//! started in between, the late activation is dropped and never marks a
//! page the user already left.
//!
//! Pages fetched on demand take a load ticket first. When the fetch
//! returns, [`NavigationController::navigate_loaded`] only navigates if no
//! newer load or navigation started in the meantime.

mod error;
mod token;

pub use error::{NavigationError, NavigationResult};
pub use token::PageToken;

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::document::{Document, NodeId, SharedDocument};

pub const PAGE_CLASS: &str = "page";
pub const MENU_ITEM_CLASS: &str = "menu-item";

const HIGHLIGHT_CLASSES: [&str; 3] = ["bg-primary", "bg-opacity-10", "text-primary"];
const IDLE_MENU_CLASSES: [&str; 2] = ["text-gray-700", "hover:bg-gray-100"];

/// Membership state of a page container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    Hidden,
    VisibleInactive,
    Active,
}

impl PageState {
    fn of(doc: &Document, node: NodeId) -> Self {
        if doc.has_class(node, "active") {
            PageState::Active
        } else if doc.has_class(node, "hidden") {
            PageState::Hidden
        } else {
            PageState::VisibleInactive
        }
    }
}

/// A navigation whose activation is still outstanding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingActivation {
    pub token: PageToken,
    pub generation: u64,
    /// Page container revealed by `begin`, if the token matched one
    target: Option<NodeId>,
}

impl PendingActivation {
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

/// Hash-driven page switcher
#[derive(Clone)]
pub struct NavigationController {
    document: SharedDocument,
    pages: Arc<Vec<PageToken>>,
    default_page: PageToken,
    transition: Duration,
    generation: Arc<AtomicU64>,
    loads: Arc<AtomicU64>,
    current: Arc<RwLock<Option<PageToken>>>,
    location: Arc<RwLock<String>>,
}

impl NavigationController {
    pub fn new(
        document: SharedDocument,
        pages: Vec<PageToken>,
        default_page: PageToken,
        transition: Duration,
    ) -> Self {
        Self {
            document,
            pages: Arc::new(pages),
            default_page,
            transition,
            generation: Arc::new(AtomicU64::new(0)),
            loads: Arc::new(AtomicU64::new(0)),
            current: Arc::new(RwLock::new(None)),
            location: Arc::new(RwLock::new(String::new())),
        }
    }

    /// Configured page tokens
    pub fn pages(&self) -> &[PageToken] {
        &self.pages
    }

    pub fn default_page(&self) -> &PageToken {
        &self.default_page
    }

    pub fn is_known(&self, token: &PageToken) -> bool {
        self.pages.contains(token)
    }

    /// Page whose container was last revealed
    pub async fn current(&self) -> Option<PageToken> {
        self.current.read().await.clone()
    }

    /// URL fragment, e.g. `#menu`
    pub async fn location(&self) -> String {
        self.location.read().await.clone()
    }

    /// First step of a navigation: hide every page, reveal the target and
    /// re-highlight the menu
    pub async fn begin(&self, token: PageToken) -> PendingActivation {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loads.fetch_add(1, Ordering::SeqCst);

        let target = {
            let mut doc = self.document.write().await;

            for page in doc.elements_by_class(PAGE_CLASS) {
                doc.remove_class(page, "active");
                doc.add_class(page, "hidden");
            }

            let target = doc.element_by_id(&token.mount_id());
            if let Some(page) = target {
                doc.remove_class(page, "hidden");
            }

            highlight_menu(&mut doc, &token);
            target
        };

        if target.is_none() {
            tracing::debug!(page = %token, "No page container for token");
        }

        *self.current.write().await = target.map(|_| token.clone());
        *self.location.write().await = token.href();

        PendingActivation {
            token,
            generation,
            target,
        }
    }

    /// Second step: mark the revealed page active
    ///
    /// Returns `false` when there is nothing to activate or a newer
    /// navigation has started since `begin`.
    pub async fn complete(&self, pending: PendingActivation) -> bool {
        let Some(page) = pending.target else {
            return false;
        };

        let mut doc = self.document.write().await;
        if self.generation.load(Ordering::SeqCst) != pending.generation {
            tracing::debug!(
                page = %pending.token,
                generation = pending.generation,
                "Dropping superseded activation"
            );
            return false;
        }

        doc.add_class(page, "active")
    }

    /// Navigate and wait out the transition delay
    pub async fn navigate(&self, token: PageToken) -> bool {
        tracing::debug!(page = %token, "Navigating");
        let pending = self.begin(token).await;
        if pending.has_target() && !self.transition.is_zero() {
            tokio::time::sleep(self.transition).await;
        }
        self.complete(pending).await
    }

    /// Ticket for an on-demand page load
    pub fn begin_load(&self) -> u64 {
        self.loads.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the newest load with no navigation since
    pub fn is_latest_load(&self, ticket: u64) -> bool {
        self.loads.load(Ordering::SeqCst) == ticket
    }

    /// Navigate to a page fetched under `ticket`
    ///
    /// Returns `false` without touching the document when a newer load or
    /// navigation has started since the ticket was issued.
    pub async fn navigate_loaded(&self, ticket: u64, token: PageToken) -> bool {
        if !self.is_latest_load(ticket) {
            tracing::debug!(page = %token, ticket, "Dropping superseded page load");
            return false;
        }
        self.navigate(token).await
    }

    /// React to a URL fragment change; an empty fragment means the default
    /// page
    ///
    /// A fragment that cannot be a page token behaves like an unknown page:
    /// every page is hidden. The error is still returned for logging.
    pub async fn handle_hash(&self, hash: &str) -> NavigationResult<bool> {
        match PageToken::from_hash(hash, &self.default_page) {
            Ok(token) => Ok(self.navigate(token).await),
            Err(e) => {
                self.clear().await;
                *self.location.write().await = format!("#{}", hash.trim_start_matches('#'));
                Err(e)
            }
        }
    }

    /// Hide all pages and clear menu highlighting
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.loads.fetch_add(1, Ordering::SeqCst);
        let mut doc = self.document.write().await;
        for page in doc.elements_by_class(PAGE_CLASS) {
            doc.remove_class(page, "active");
            doc.add_class(page, "hidden");
        }
        reset_menu(&mut doc);
        drop(doc);
        *self.current.write().await = None;
    }

    /// State of a configured page's container
    pub async fn page_state(&self, token: &PageToken) -> NavigationResult<PageState> {
        if !self.is_known(token) {
            return Err(NavigationError::UnknownPage(token.to_string()));
        }
        let doc = self.document.read().await;
        Ok(doc
            .element_by_id(&token.mount_id())
            .map(|node| PageState::of(&doc, node))
            .unwrap_or(PageState::Hidden))
    }

    /// Ids of all `.page` containers currently active
    pub async fn active_pages(&self) -> Vec<String> {
        let doc = self.document.read().await;
        doc.elements_by_class(PAGE_CLASS)
            .into_iter()
            .filter(|&node| doc.has_class(node, "active"))
            .filter_map(|node| doc.attr(node, "id").map(str::to_string))
            .collect()
    }
}

fn reset_menu(doc: &mut Document) {
    for item in doc.elements_by_class(MENU_ITEM_CLASS) {
        for class in HIGHLIGHT_CLASSES {
            doc.remove_class(item, class);
        }
        for class in IDLE_MENU_CLASSES {
            doc.add_class(item, class);
        }
    }
}

fn highlight_menu(doc: &mut Document, token: &PageToken) {
    reset_menu(doc);
    if let Some(item) = doc.find_by_attr(MENU_ITEM_CLASS, "href", &token.href()) {
        for class in HIGHLIGHT_CLASSES {
            doc.add_class(item, class);
        }
        for class in IDLE_MENU_CLASSES {
            doc.remove_class(item, class);
        }
    }
}
