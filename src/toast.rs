//! Toast Notifications
//!
//! Short-lived status messages. Each toast is appended to
//! `#toastContainer` when that element exists and is removed again once
//! its display duration elapses.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{escape_text, SharedDocument};

pub const TOAST_CONTAINER_ID: &str = "toastContainer";

/// Visual variant of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "check-circle",
            ToastKind::Error => "exclamation-circle",
            ToastKind::Warning => "exclamation-triangle",
            ToastKind::Info => "info-circle",
        }
    }

    /// Tailwind color family of the icon
    pub fn color(&self) -> &'static str {
        match self {
            ToastKind::Success => "green",
            ToastKind::Error => "red",
            ToastKind::Warning => "yellow",
            ToastKind::Info => "blue",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    fn render(&self) -> String {
        format!(
            r#"<div class="toast {kind}" data-toast-id="{id}"><div class="flex items-center"><i class="fas fa-{icon} text-{color}-500 mr-3"></i><span class="text-sm font-medium">{message}</span></div></div>"#,
            kind = self.kind.as_str(),
            id = self.id,
            icon = self.kind.icon(),
            color = self.kind.color(),
            message = escape_text(&self.message),
        )
    }
}

/// Shows and expires toasts
#[derive(Clone)]
pub struct ToastCenter {
    document: SharedDocument,
    active: Arc<RwLock<Vec<Toast>>>,
    /// Every toast shown this session, oldest first
    history: Arc<RwLock<Vec<Toast>>>,
    duration: Duration,
}

impl ToastCenter {
    pub fn new(document: SharedDocument, duration: Duration) -> Self {
        Self {
            document,
            active: Arc::new(RwLock::new(Vec::new())),
            history: Arc::new(RwLock::new(Vec::new())),
            duration,
        }
    }

    /// Show a toast and schedule its removal
    pub async fn show(&self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        };
        let id = toast.id;

        {
            let mut doc = self.document.write().await;
            if let Some(container) = doc.element_by_id(TOAST_CONTAINER_ID) {
                doc.append_html(container, &toast.render());
            }
        }

        tracing::debug!(toast_id = %id, kind = kind.as_str(), message = %toast.message, "Toast shown");
        self.history.write().await.push(toast.clone());
        self.active.write().await.push(toast);

        let center = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(center.duration).await;
            center.dismiss(id).await;
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastKind::Success).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastKind::Error).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastKind::Info).await
    }

    /// Remove a toast early; returns false if it already expired
    pub async fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut active = self.active.write().await;
            let before = active.len();
            active.retain(|t| t.id != id);
            active.len() != before
        };

        let mut doc = self.document.write().await;
        if let Some(node) = doc.find_by_attr("toast", "data-toast-id", &id.to_string()) {
            doc.remove_node(node);
        }
        removed
    }

    /// Toasts currently on screen
    pub async fn active(&self) -> Vec<Toast> {
        self.active.read().await.clone()
    }

    pub async fn history(&self) -> Vec<Toast> {
        self.history.read().await.clone()
    }

    /// Messages of every toast shown so far
    pub async fn messages(&self) -> Vec<String> {
        self.history
            .read()
            .await
            .iter()
            .map(|t| t.message.clone())
            .collect()
    }
}
