//! Sidebar: menu highlighting, mobile toggle and role tabs

use async_trait::async_trait;

use super::activate_tab;
use crate::app::{AppContext, UiEvent};
use crate::data::Role;
use crate::document::Document;
use crate::navigation::{PageToken, MENU_ITEM_CLASS};
use crate::registry::{Capabilities, Component, ComponentResult};

const SIDEBAR_CLASS: &str = "sidebar";
const ROLE_TAB_CLASS: &str = "role-tab";

#[derive(Debug, Default)]
pub struct SidebarComponent;

impl SidebarComponent {
    pub fn new() -> Self {
        Self
    }

    async fn switch_role(&self, ctx: &AppContext, role: Role) {
        let switched = {
            let mut doc = ctx.document.write().await;
            let tab = doc
                .elements_by_class(ROLE_TAB_CLASS)
                .into_iter()
                .find(|&tab| doc.text_content(tab).trim() == role.tab_label());
            match tab {
                Some(tab) => activate_tab(&mut doc, ROLE_TAB_CLASS, tab),
                None => false,
            }
        };

        if switched {
            ctx.toasts
                .success(format!("Berhasil beralih ke mode {}", role.tab_label()))
                .await;
        } else {
            tracing::debug!(role = role.tab_label(), "No role tab for role");
        }
    }
}

/// Move the active item to the navigator's current page, or clear it when
/// no page is showing
async fn sync_with_navigator(ctx: &AppContext) {
    let current = ctx.navigator.current().await;
    let mut doc = ctx.document.write().await;
    match current {
        Some(page) => {
            mark_active_item(&mut doc, page.as_str());
        }
        None => {
            for item in doc.elements_by_class(MENU_ITEM_CLASS) {
                doc.remove_class(item, "active");
            }
        }
    }
}

/// Mark the `.menu-item` with `data-page` equal to `page` as active
fn mark_active_item(doc: &mut Document, page: &str) -> bool {
    let Some(item) = doc.find_by_attr(MENU_ITEM_CLASS, "data-page", page) else {
        return false;
    };
    for other in doc.elements_by_class(MENU_ITEM_CLASS) {
        doc.remove_class(other, "active");
    }
    doc.add_class(item, "active")
}

#[async_trait]
impl Component for SidebarComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE.with_init().with_update()
    }

    fn mount_point(&self) -> Option<&str> {
        Some("sidebar")
    }

    async fn init(&mut self, ctx: &AppContext) -> ComponentResult<()> {
        let location = ctx.navigator.location().await;
        let page = PageToken::from_hash(&location, ctx.navigator.default_page())
            .unwrap_or_else(|_| ctx.navigator.default_page().clone());

        let mut doc = ctx.document.write().await;
        mark_active_item(&mut doc, page.as_str());
        tracing::debug!("Sidebar component initialized");
        Ok(())
    }

    async fn update(&mut self, ctx: &AppContext, event: &UiEvent) -> ComponentResult<()> {
        match event {
            UiEvent::ToggleSidebar => {
                let mut doc = ctx.document.write().await;
                if let Some(sidebar) = doc.elements_by_class(SIDEBAR_CLASS).first().copied() {
                    doc.toggle_class(sidebar, "open");
                }
            }
            UiEvent::OutsideClick => {
                let mut doc = ctx.document.write().await;
                for sidebar in doc.elements_by_class(SIDEBAR_CLASS) {
                    doc.remove_class(sidebar, "open");
                }
            }
            UiEvent::MenuItem(href) => {
                let page = href.rsplit('#').next().unwrap_or_default();
                let mut doc = ctx.document.write().await;
                mark_active_item(&mut doc, page);
            }
            UiEvent::HashChange(_) | UiEvent::LoadPage(_) => sync_with_navigator(ctx).await,
            UiEvent::RoleTab(role) => self.switch_role(ctx, *role).await,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fragment::StaticSource;
    use std::sync::Arc;

    const SIDEBAR: &str = include_str!("../../assets/includes/sidebar.html");

    fn context() -> AppContext {
        AppContext::new(
            Config::default(),
            &format!(
                r#"{}<div id="dashboardPage" class="page"></div><div id="menuPage" class="page hidden"></div><div id="toastContainer"></div>"#,
                SIDEBAR
            ),
            Arc::new(StaticSource::new()),
        )
        .unwrap()
    }

    async fn active_item(ctx: &AppContext) -> Vec<String> {
        let doc = ctx.document.read().await;
        doc.elements_by_class(MENU_ITEM_CLASS)
            .into_iter()
            .filter(|&n| doc.has_class(n, "active"))
            .filter_map(|n| doc.attr(n, "data-page").map(str::to_string))
            .collect()
    }

    #[tokio::test]
    async fn test_init_highlights_default_page() {
        let ctx = context();
        let mut sidebar = SidebarComponent::new();
        sidebar.init(&ctx).await.unwrap();
        assert_eq!(active_item(&ctx).await, vec!["dashboard"]);
    }

    #[tokio::test]
    async fn test_menu_item_moves_active_class() {
        let ctx = context();
        let mut sidebar = SidebarComponent::new();
        sidebar.init(&ctx).await.unwrap();
        sidebar
            .update(&ctx, &UiEvent::MenuItem("#struk".to_string()))
            .await
            .unwrap();
        assert_eq!(active_item(&ctx).await, vec!["struk"]);
    }

    #[tokio::test]
    async fn test_hash_change_follows_navigator() {
        let ctx = context();
        let mut sidebar = SidebarComponent::new();
        sidebar.init(&ctx).await.unwrap();

        ctx.navigator.handle_hash("#menu").await.unwrap();
        sidebar
            .update(&ctx, &UiEvent::HashChange("#menu".to_string()))
            .await
            .unwrap();
        assert_eq!(active_item(&ctx).await, vec!["menu"]);

        ctx.navigator.handle_hash("#laporan").await.unwrap();
        sidebar
            .update(&ctx, &UiEvent::HashChange("#laporan".to_string()))
            .await
            .unwrap();
        assert!(active_item(&ctx).await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_and_outside_click() {
        let ctx = context();
        let mut sidebar = SidebarComponent::new();

        sidebar.update(&ctx, &UiEvent::ToggleSidebar).await.unwrap();
        {
            let doc = ctx.document.read().await;
            assert!(doc.has_class(doc.element_by_id("sidebar").unwrap(), "open"));
        }

        sidebar.update(&ctx, &UiEvent::OutsideClick).await.unwrap();
        let doc = ctx.document.read().await;
        assert!(!doc.has_class(doc.element_by_id("sidebar").unwrap(), "open"));
    }

    #[tokio::test]
    async fn test_role_tab_switch() {
        let ctx = context();
        let mut sidebar = SidebarComponent::new();

        sidebar
            .update(&ctx, &UiEvent::RoleTab(Role::Kasir))
            .await
            .unwrap();
        {
            let doc = ctx.document.read().await;
            let tabs = doc.elements_by_class(ROLE_TAB_CLASS);
            assert!(!doc.has_class(tabs[0], "active"));
            assert!(doc.has_class(tabs[1], "active"));
            assert!(doc.has_class(tabs[1], "text-white"));
        }

        // No tab for this role: nothing changes, no toast
        sidebar
            .update(&ctx, &UiEvent::RoleTab(Role::Pelanggan))
            .await
            .unwrap();
        assert_eq!(
            ctx.toasts.messages().await,
            vec!["Berhasil beralih ke mode Kasir"]
        );
    }
}
