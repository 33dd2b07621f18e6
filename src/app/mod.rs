//! CanteenApps application
//!
//! Ties the pieces together. Boot loads the shell fragments, initializes
//! the registered components, writes the user header and date, activates
//! the page named in the URL fragment, then lifts the loading screen.
//! After boot, [`UiEvent`]s are dispatched to the components.
//!
//! Pages can also be fetched on demand with [`CanteenApp::load_page`]; only
//! the newest of several overlapping loads navigates.
//!
//! # Example
//!
//! ```rust,ignore
//! use canteen::app::{AppContext, CanteenApp, UiEvent};
//! use canteen::config::Config;
//!
//! let config = Config::load_default();
//! let source = config.assets.fragment_source()?;
//! let ctx = AppContext::new(config.clone(), &config.assets.shell_html(), source)?;
//!
//! let mut app = CanteenApp::new(ctx);
//! app.boot("#menu").await?;
//! app.dispatch(UiEvent::Refresh).await?;
//! println!("{}", app.render().await);
//! ```

mod context;
mod error;
mod events;

pub use context::{AppContext, Clock};
pub use error::{AppError, AppResult};
pub use events::{EventParseError, QuickAction, UiEvent};

use std::sync::Arc;

use crate::components::{activate_tab, default_components};
use crate::format::format_long_date;
use crate::fragment::{FragmentRequest, LoadOutcome, LoadReport};
use crate::navigation::PageToken;
use crate::registry::{Component, ComponentRegistry, InitReport};

const SHELL_INCLUDES: [&str; 3] = ["navbar", "sidebar", "footer"];

type ComponentFactory = dyn Fn() -> Vec<(&'static str, Box<dyn Component>)> + Send + Sync;

/// What happened during boot
#[derive(Debug)]
pub struct BootReport {
    pub fragments: LoadReport,
    pub components: InitReport,
    /// Page active after the initial navigation
    pub page: Option<PageToken>,
}

/// The dashboard application
pub struct CanteenApp {
    ctx: AppContext,
    registry: ComponentRegistry,
    factory: Arc<ComponentFactory>,
}

impl CanteenApp {
    /// App with the navbar, sidebar and dashboard components
    pub fn new(ctx: AppContext) -> Self {
        Self::with_components(ctx, default_components)
    }

    /// App whose components come from `factory`, called again on reload
    pub fn with_components<F>(ctx: AppContext, factory: F) -> Self
    where
        F: Fn() -> Vec<(&'static str, Box<dyn Component>)> + Send + Sync + 'static,
    {
        let mut app = Self {
            ctx,
            registry: ComponentRegistry::new(),
            factory: Arc::new(factory),
        };
        app.register_components();
        app
    }

    fn register_components(&mut self) {
        for (name, component) in (self.factory)() {
            self.registry.register(name, component);
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Boot with `hash` as the initial URL fragment
    ///
    /// Any error aborts the loading transition and shows a failure toast.
    pub async fn boot(&mut self, hash: &str) -> AppResult<BootReport> {
        match self.try_boot(hash).await {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::error!(error = %e, "Error initializing app");
                self.ctx.toasts.error("Gagal memuat aplikasi").await;
                Err(e)
            }
        }
    }

    async fn try_boot(&mut self, hash: &str) -> AppResult<BootReport> {
        tracing::info!(source = %self.ctx.loader.source().describe(), "Booting CanteenApps");

        let fragments = self.load_fragments().await;
        let components = self.registry.init(&self.ctx).await;

        self.write_user_info().await;
        self.write_current_date().await;

        if let Err(e) = self.ctx.navigator.handle_hash(hash).await {
            tracing::warn!(error = %e, hash, "Initial location is not a page");
        }
        // Components initialized before the location was applied
        let initial = UiEvent::HashChange(hash.to_string());
        for (name, e) in self.registry.broadcast(&self.ctx, &initial).await {
            tracing::warn!(component = %name, error = %e, "Initial location handler failed");
        }
        let page = self.ctx.navigator.current().await;

        let delay = self.ctx.config.ui.loading_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.reveal_app().await?;

        self.ctx.toasts.success("CanteenApps berhasil dimuat!").await;
        tracing::info!(
            fragments = fragments.loaded(),
            components = components.initialized.len(),
            page = page.as_ref().map(PageToken::as_str).unwrap_or("-"),
            "CanteenApps ready"
        );

        Ok(BootReport {
            fragments,
            components,
            page,
        })
    }

    async fn load_fragments(&self) -> LoadReport {
        let requests: Vec<FragmentRequest> = SHELL_INCLUDES
            .iter()
            .map(|name| FragmentRequest::include(name))
            .chain(
                self.ctx
                    .navigator
                    .pages()
                    .iter()
                    .map(|page| FragmentRequest::page(page.as_str())),
            )
            .collect();

        let report = self.ctx.loader.load_all(&requests).await;
        for failed in report.failures() {
            self.ctx
                .toasts
                .error(format!("Gagal memuat {}", failed.locator))
                .await;
        }
        report
    }

    async fn write_user_info(&self) {
        let user = self.ctx.user.read().await.clone();
        let initials = crate::format::user_initials(&user.name);

        let mut doc = self.ctx.document.write().await;
        for (id, text) in [
            ("userAvatar", initials.as_str()),
            ("userName", user.name.as_str()),
            ("userRole", user.role.label()),
            ("dropdownUserName", user.name.as_str()),
            ("dropdownUserRole", user.role.label()),
        ] {
            if let Some(node) = doc.element_by_id(id) {
                doc.set_text(node, text);
            }
        }
    }

    async fn write_current_date(&self) {
        let today = self.ctx.now().date_naive();
        let mut doc = self.ctx.document.write().await;
        if let Some(node) = doc.element_by_id("currentDate") {
            doc.set_text(node, &format_long_date(today));
        }
    }

    /// Hide the loading screen and show the application container
    async fn reveal_app(&self) -> AppResult<()> {
        let mut doc = self.ctx.document.write().await;
        let app = doc
            .element_by_id("appContainer")
            .ok_or_else(|| AppError::ShellElementMissing("appContainer".to_string()))?;

        if let Some(loading) = doc.element_by_id("loadingScreen") {
            doc.set_attr(loading, "style", "display: none");
        }
        doc.remove_class(app, "hidden");
        Ok(())
    }

    /// Fetch `pages/<page>.html` into its container, then navigate to it
    ///
    /// Returns `true` once the page is showing. A load overtaken by a newer
    /// load or navigation leaves the current page alone and shows no toast.
    pub async fn load_page(&self, page: &str) -> bool {
        let token = match PageToken::parse(page) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, page, "Cannot load page");
                self.ctx.toasts.error("Gagal memuat halaman").await;
                return false;
            }
        };

        let ticket = self.ctx.navigator.begin_load();
        match self.ctx.loader.load(&FragmentRequest::page(token.as_str())).await {
            LoadOutcome::Loaded { .. } => {
                if !self.ctx.navigator.navigate_loaded(ticket, token.clone()).await {
                    return false;
                }
                self.ctx.toasts.success(format!("Halaman {} dimuat", token)).await;
                true
            }
            LoadOutcome::Superseded => {
                tracing::debug!(page = %token, "Page load overtaken by a newer one");
                false
            }
            LoadOutcome::MountMissing => {
                tracing::error!(page = %token, "No container for page");
                self.ctx.toasts.error("Gagal memuat halaman").await;
                false
            }
            LoadOutcome::Failed { reason } => {
                tracing::error!(page = %token, reason = %reason, "Error loading page");
                self.ctx.toasts.error("Gagal memuat halaman").await;
                false
            }
        }
    }

    /// Route an event to the app and its components
    pub async fn dispatch(&mut self, event: UiEvent) -> AppResult<()> {
        tracing::debug!(event = %event, "Dispatching");

        match &event {
            UiEvent::HashChange(hash) => {
                if let Err(e) = self.ctx.navigator.handle_hash(hash).await {
                    tracing::warn!(error = %e, "Ignoring location");
                }
            }
            UiEvent::MenuItem(href) => {
                let hash = href.rsplit_once('#').map(|(_, h)| h).unwrap_or(href.as_str());
                if let Err(e) = self.ctx.navigator.handle_hash(hash).await {
                    tracing::warn!(error = %e, href = %href, "Menu item has no page target");
                }
            }
            UiEvent::LoadPage(page) => {
                self.load_page(page).await;
            }
            UiEvent::OrderTab(index) => {
                let mut doc = self.ctx.document.write().await;
                if let Some(tab) = doc.elements_by_class("order-tab").get(*index).copied() {
                    activate_tab(&mut doc, "order-tab", tab);
                }
            }
            UiEvent::Logout { confirmed } => {
                if !confirmed {
                    return Ok(());
                }
                self.ctx.toasts.success("Berhasil keluar dari sistem").await;
                let delay = self.ctx.config.ui.logout_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.reload().await?;
                return Ok(());
            }
            _ => {}
        }

        let failures = self.registry.broadcast(&self.ctx, &event).await;
        match failures.into_iter().next() {
            Some((name, e)) => {
                tracing::error!(component = %name, event = %event, error = %e, "Event handler failed");
                Err(e.into())
            }
            None => Ok(()),
        }
    }

    /// Discard the session and boot again at the current location
    pub async fn reload(&mut self) -> AppResult<BootReport> {
        let location = self.ctx.navigator.location().await;
        tracing::info!(location = %location, "Reloading");

        self.registry.destroy_all(&self.ctx).await;
        self.ctx.reset().await;
        self.register_components();
        self.boot(&location).await
    }

    /// Run every component's destroy hook
    pub async fn shutdown(&mut self) {
        self.registry.destroy_all(&self.ctx).await;
        tracing::info!("CanteenApps shut down");
    }

    /// Current document as HTML
    pub async fn render(&self) -> String {
        self.ctx.html().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, UiConfig, BUILTIN_SHELL};
    use crate::fragment::{FragmentSource, StaticSource};
    use crate::registry::{Capabilities, ComponentError, ComponentResult, LifecycleState};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::time::Duration;

    fn instant_config() -> Config {
        Config {
            ui: UiConfig::instant(),
            ..Default::default()
        }
    }

    fn app_with(source: StaticSource) -> CanteenApp {
        app_from(instant_config(), source)
    }

    fn app_from(config: Config, source: impl FragmentSource + 'static) -> CanteenApp {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let ctx = AppContext::with_clock(config, BUILTIN_SHELL, Arc::new(source), Clock::Fixed(now))
            .unwrap()
            .with_seed(1);
        CanteenApp::new(ctx)
    }

    /// Built-in assets with a per-locator fetch delay
    struct SlowSource {
        inner: StaticSource,
        delays: HashMap<&'static str, Duration>,
    }

    #[async_trait]
    impl FragmentSource for SlowSource {
        fn describe(&self) -> String {
            "slow".to_string()
        }

        async fn fetch(&self, locator: &str) -> crate::fragment::FragmentResult<String> {
            if let Some(delay) = self.delays.get(locator) {
                tokio::time::sleep(*delay).await;
            }
            self.inner.fetch(locator).await
        }
    }

    async fn active_menu_items(app: &CanteenApp) -> Vec<String> {
        let doc = app.context().document.read().await;
        doc.elements_by_class("menu-item")
            .into_iter()
            .filter(|&n| doc.has_class(n, "active"))
            .filter_map(|n| doc.attr(n, "data-page").map(str::to_string))
            .collect()
    }

    async fn text_of(app: &CanteenApp, id: &str) -> String {
        let doc = app.context().document.read().await;
        doc.element_by_id(id)
            .map(|n| doc.text_content(n))
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_boot_with_builtin_assets() {
        let mut app = app_with(StaticSource::builtin());
        let report = app.boot("").await.unwrap();

        assert_eq!(report.fragments.loaded(), 7);
        assert!(report.components.is_clean());
        assert_eq!(report.components.initialized, vec!["navbar", "sidebar", "dashboard"]);
        assert_eq!(report.page.as_ref().map(PageToken::as_str), Some("dashboard"));

        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["dashboardPage".to_string()]
        );
        assert_eq!(text_of(&app, "currentDate").await, "Senin, 19 Oktober 2026");
        assert_eq!(text_of(&app, "userName").await, "Admin Kantin");

        let doc = app.context().document.read().await;
        let container = doc.element_by_id("appContainer").unwrap();
        assert!(!doc.has_class(container, "hidden"));
        let loading = doc.element_by_id("loadingScreen").unwrap();
        assert_eq!(doc.attr(loading, "style"), Some("display: none"));
        drop(doc);

        assert_eq!(
            app.context().toasts.messages().await,
            vec!["CanteenApps berhasil dimuat!"]
        );
    }

    #[tokio::test]
    async fn test_boot_survives_missing_fragments() {
        let builtin = StaticSource::builtin();
        let mut partial = StaticSource::new();
        for locator in builtin.locators() {
            if locator != "includes/sidebar.html" {
                let html = builtin.fetch(locator).await.unwrap();
                partial = partial.with(locator, html);
            }
        }

        let mut app = app_with(partial);
        let report = app.boot("#menu").await.unwrap();

        assert_eq!(report.fragments.failures().len(), 1);
        assert_eq!(report.components.unmounted, vec!["sidebar"]);
        assert_eq!(
            app.registry().state("sidebar"),
            Some(LifecycleState::Unmounted)
        );
        assert_eq!(report.page.as_ref().map(PageToken::as_str), Some("menu"));

        let messages = app.context().toasts.messages().await;
        assert_eq!(messages[0], "Gagal memuat includes/sidebar.html");
        assert_eq!(messages.last().unwrap(), "CanteenApps berhasil dimuat!");
    }

    #[tokio::test]
    async fn test_boot_failure_shows_generic_toast() {
        let ctx = AppContext::new(
            instant_config(),
            r#"<div id="toastContainer"></div>"#,
            Arc::new(StaticSource::builtin()),
        )
        .unwrap();
        let mut app = CanteenApp::new(ctx);

        let err = app.boot("").await.unwrap_err();
        assert!(matches!(err, AppError::ShellElementMissing(_)));
        assert_eq!(
            app.context().toasts.messages().await,
            vec!["Gagal memuat aplikasi"]
        );
    }

    #[tokio::test]
    async fn test_dispatch_navigation_events() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("").await.unwrap();

        app.dispatch(UiEvent::MenuItem("#pesanan".to_string()))
            .await
            .unwrap();
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["pesananPage".to_string()]
        );

        app.dispatch(UiEvent::HashChange("#laporan".to_string()))
            .await
            .unwrap();
        assert!(app.context().navigator.active_pages().await.is_empty());

        app.dispatch(UiEvent::HashChange(String::new())).await.unwrap();
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["dashboardPage".to_string()]
        );
    }

    #[tokio::test]
    async fn test_boot_at_location_highlights_sidebar() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("#menu").await.unwrap();
        assert_eq!(active_menu_items(&app).await, vec!["menu"]);

        app.dispatch(UiEvent::HashChange("#struk".to_string()))
            .await
            .unwrap();
        assert_eq!(active_menu_items(&app).await, vec!["struk"]);
    }

    #[tokio::test]
    async fn test_load_page_event_fetches_and_navigates() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("").await.unwrap();

        app.dispatch(UiEvent::LoadPage("struk".to_string()))
            .await
            .unwrap();
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["strukPage".to_string()]
        );
        assert_eq!(app.context().navigator.location().await, "#struk");
        assert_eq!(active_menu_items(&app).await, vec!["struk"]);
        assert_eq!(
            app.context().toasts.messages().await.last().map(String::as_str),
            Some("Halaman struk dimuat")
        );
    }

    #[tokio::test]
    async fn test_load_page_failures_show_toast() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("#menu").await.unwrap();

        assert!(!app.load_page("laporan").await);
        assert!(!app.load_page("9x").await);

        let messages = app.context().toasts.messages().await;
        assert_eq!(
            messages[messages.len() - 2..],
            ["Gagal memuat halaman", "Gagal memuat halaman"]
        );
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["menuPage".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_page_loads_keep_newest() {
        let source = SlowSource {
            inner: StaticSource::builtin(),
            delays: [
                ("pages/menu.html", Duration::from_millis(500)),
                ("pages/struk.html", Duration::from_millis(10)),
            ]
            .into_iter()
            .collect(),
        };
        let mut app = app_from(instant_config(), source);
        app.boot("").await.unwrap();

        let (menu, struk) = tokio::join!(app.load_page("menu"), async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            app.load_page("struk").await
        });

        assert!(!menu);
        assert!(struk);
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["strukPage".to_string()]
        );
        assert_eq!(app.context().navigator.location().await, "#struk");

        let messages = app.context().toasts.messages().await;
        assert!(messages.contains(&"Halaman struk dimuat".to_string()));
        assert!(!messages.contains(&"Halaman menu dimuat".to_string()));
    }

    #[tokio::test]
    async fn test_order_tab_event() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("#pesanan").await.unwrap();
        app.dispatch(UiEvent::OrderTab(1)).await.unwrap();

        let doc = app.context().document.read().await;
        let tabs = doc.elements_by_class("order-tab");
        assert!(doc.has_class(tabs[1], "active"));
        assert!(!doc.has_class(tabs[0], "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_logout_reloads_session() {
        let mut app = app_with(StaticSource::builtin());
        app.boot("#menu").await.unwrap();
        app.dispatch(UiEvent::MarkAllRead).await.unwrap();
        assert_eq!(app.context().notifications.read().await.unread_count(), 0);

        app.dispatch(UiEvent::Logout { confirmed: false }).await.unwrap();
        assert_eq!(app.context().notifications.read().await.unread_count(), 0);

        app.dispatch(UiEvent::Logout { confirmed: true }).await.unwrap();
        assert_eq!(app.context().notifications.read().await.unread_count(), 2);
        assert!(app.registry().is_initialized());
        assert_eq!(
            app.context().navigator.active_pages().await,
            vec!["menuPage".to_string()]
        );

        let messages = app.context().toasts.messages().await;
        assert!(messages.contains(&"Berhasil keluar dari sistem".to_string()));
        assert_eq!(messages.last().unwrap(), "CanteenApps berhasil dimuat!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_waits_configured_delay() {
        let mut config = instant_config();
        config.ui.logout_delay_ms = 1000;
        let mut app = app_from(config, StaticSource::builtin());
        app.boot("").await.unwrap();

        let started = tokio::time::Instant::now();
        app.dispatch(UiEvent::Logout { confirmed: true }).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert!(app.registry().is_initialized());
    }

    struct Failing;

    #[async_trait]
    impl Component for Failing {
        fn capabilities(&self) -> Capabilities {
            Capabilities::NONE.with_update()
        }

        async fn update(&mut self, _ctx: &AppContext, event: &UiEvent) -> ComponentResult<()> {
            match event {
                UiEvent::Refresh => Err(ComponentError::failed("failing", "no data")),
                _ => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_dispatch_reports_component_failure() {
        let ctx = AppContext::new(
            instant_config(),
            BUILTIN_SHELL,
            Arc::new(StaticSource::builtin()),
        )
        .unwrap();
        let mut app = CanteenApp::with_components(ctx, || {
            vec![("failing", Box::new(Failing) as Box<dyn Component>)]
        });
        app.boot("").await.unwrap();

        assert!(app.dispatch(UiEvent::ToggleSidebar).await.is_ok());
        let err = app.dispatch(UiEvent::Refresh).await.unwrap_err();
        assert!(matches!(err, AppError::Component(_)));
    }
}
