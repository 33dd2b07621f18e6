//! Navbar: notifications dropdown, user menu and search box

use async_trait::async_trait;

use super::fill_text;
use crate::app::{AppContext, UiEvent};
use crate::document::Document;
use crate::format::user_initials;
use crate::registry::{Capabilities, Component, ComponentResult};

const NOTIFICATION_DROPDOWN: &str = "notification-dropdown-content";
const USER_DROPDOWN: &str = "user-dropdown";

#[derive(Debug, Default)]
pub struct NavbarComponent;

impl NavbarComponent {
    pub fn new() -> Self {
        Self
    }

    async fn render_notifications(&self, ctx: &AppContext) {
        let feed = ctx.notifications.read().await;
        let html = feed.render(ctx.now());
        let unread = feed.unread_count();
        drop(feed);

        let mut doc = ctx.document.write().await;
        if let Some(list) = doc.elements_by_class("notification-list").first().copied() {
            doc.set_inner_html(list, &html);
        }
        if let Some(badge) = doc.elements_by_class("notification-badge").first().copied() {
            doc.set_text(badge, &unread.to_string());
            if unread == 0 {
                doc.remove_class(badge, "animate-pulse");
            } else {
                doc.add_class(badge, "animate-pulse");
            }
        }
    }

    async fn render_user(&self, ctx: &AppContext) {
        let user = ctx.user.read().await.clone();
        let mut doc = ctx.document.write().await;
        fill_text(
            &mut doc,
            &["user-avatar", "user-dropdown-avatar"],
            &user_initials(&user.name),
        );
        fill_text(&mut doc, &["user-name", "user-dropdown-name"], &user.name);
        fill_text(
            &mut doc,
            &["user-role", "user-dropdown-email"],
            user.role.label(),
        );
    }

    async fn mark_all_read(&self, ctx: &AppContext) {
        ctx.notifications.write().await.mark_all_read();
        self.render_notifications(ctx).await;
        ctx.toasts
            .success("Semua notifikasi ditandai sebagai dibaca")
            .await;
    }
}

/// Toggle `show` on the first `.class`, closing the other dropdown
fn toggle_dropdown(doc: &mut Document, class: &str, other: &str) {
    close_dropdown(doc, other);
    if let Some(node) = doc.elements_by_class(class).first().copied() {
        doc.toggle_class(node, "show");
    }
}

fn close_dropdown(doc: &mut Document, class: &str) {
    for node in doc.elements_by_class(class) {
        doc.remove_class(node, "show");
    }
}

fn set_search_clear_visible(doc: &mut Document, visible: bool) {
    if let Some(clear) = doc.elements_by_class("search-clear").first().copied() {
        let display = if visible { "display: block" } else { "display: none" };
        doc.set_attr(clear, "style", display);
    }
}

#[async_trait]
impl Component for NavbarComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with_init().with_update()
    }

    fn mount_point(&self) -> Option<&str> {
        Some("navbar")
    }

    async fn init(&mut self, ctx: &AppContext) -> ComponentResult<()> {
        self.render_notifications(ctx).await;
        self.render_user(ctx).await;
        tracing::debug!("Navbar component initialized");
        Ok(())
    }

    async fn update(&mut self, ctx: &AppContext, event: &UiEvent) -> ComponentResult<()> {
        match event {
            UiEvent::ToggleNotifications => {
                let mut doc = ctx.document.write().await;
                toggle_dropdown(&mut doc, NOTIFICATION_DROPDOWN, USER_DROPDOWN);
            }
            UiEvent::ToggleUserMenu => {
                let mut doc = ctx.document.write().await;
                toggle_dropdown(&mut doc, USER_DROPDOWN, NOTIFICATION_DROPDOWN);
            }
            UiEvent::OutsideClick => {
                let mut doc = ctx.document.write().await;
                close_dropdown(&mut doc, NOTIFICATION_DROPDOWN);
                close_dropdown(&mut doc, USER_DROPDOWN);
            }
            UiEvent::MarkAllRead => self.mark_all_read(ctx).await,
            UiEvent::SearchInput(text) => {
                let mut doc = ctx.document.write().await;
                if let Some(input) = doc.elements_by_class("search-input").first().copied() {
                    doc.set_attr(input, "value", text);
                }
                set_search_clear_visible(&mut doc, !text.is_empty());
            }
            UiEvent::SearchClear => {
                let mut doc = ctx.document.write().await;
                if let Some(input) = doc.elements_by_class("search-input").first().copied() {
                    doc.set_attr(input, "value", "");
                }
                set_search_clear_visible(&mut doc, false);
            }
            _ => {}
        }
        Ok(())
    }
}
