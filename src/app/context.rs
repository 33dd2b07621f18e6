//! Application context handed to every component

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::error::AppResult;
use crate::config::Config;
use crate::data::{CurrentUser, DashboardData, Variation};
use crate::document::{Document, SharedDocument};
use crate::fragment::{FragmentLoader, FragmentSource};
use crate::navigation::NavigationController;
use crate::notification::NotificationFeed;
use crate::toast::ToastCenter;

/// Source of "now" for dates and relative times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Shared services and session state
///
/// Cloning is cheap; every clone sees the same document and state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub document: SharedDocument,
    pub loader: FragmentLoader,
    pub toasts: ToastCenter,
    pub navigator: NavigationController,
    pub user: Arc<RwLock<CurrentUser>>,
    pub dashboard: Arc<RwLock<DashboardData>>,
    pub notifications: Arc<RwLock<NotificationFeed>>,
    pub variation: Arc<Mutex<Variation>>,
    pub clock: Clock,
    shell: Arc<String>,
}

impl AppContext {
    pub fn new(
        config: Config,
        shell_html: &str,
        source: Arc<dyn FragmentSource>,
    ) -> AppResult<Self> {
        Self::with_clock(config, shell_html, source, Clock::System)
    }

    pub fn with_clock(
        config: Config,
        shell_html: &str,
        source: Arc<dyn FragmentSource>,
        clock: Clock,
    ) -> AppResult<Self> {
        let document = Document::parse(shell_html).into_shared();
        let navigator = NavigationController::new(
            document.clone(),
            config.navigation.page_tokens()?,
            config.navigation.default_token()?,
            config.navigation.transition_delay(),
        );
        let toasts = ToastCenter::new(document.clone(), config.ui.toast_duration());
        let now = clock.now();

        Ok(Self {
            loader: FragmentLoader::new(source, document.clone()),
            toasts,
            navigator,
            document,
            user: Arc::new(RwLock::new(CurrentUser::sample())),
            dashboard: Arc::new(RwLock::new(DashboardData::sample())),
            notifications: Arc::new(RwLock::new(NotificationFeed::sample(now))),
            variation: Arc::new(Mutex::new(Variation::from_entropy())),
            clock,
            config: Arc::new(config),
            shell: Arc::new(shell_html.to_string()),
        })
    }

    /// Deterministic jitter for refreshes
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            variation: Arc::new(Mutex::new(Variation::seeded(seed))),
            ..self
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Put the shell and session state back to how they were at startup
    pub async fn reset(&self) {
        *self.document.write().await = Document::parse(&self.shell);
        *self.user.write().await = CurrentUser::sample();
        *self.dashboard.write().await = DashboardData::sample();
        *self.notifications.write().await = NotificationFeed::sample(self.now());
    }

    /// Serialized document
    pub async fn html(&self) -> String {
        self.document.read().await.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::StaticSource;

    #[tokio::test]
    async fn test_reset_restores_shell() {
        let ctx = AppContext::new(
            Config::default(),
            r#"<div id="navbarContainer"></div>"#,
            Arc::new(StaticSource::new()),
        )
        .unwrap();

        {
            let mut doc = ctx.document.write().await;
            let mount = doc.element_by_id("navbarContainer").unwrap();
            doc.set_inner_html(mount, "<nav></nav>");
        }
        ctx.dashboard.write().await.stats.orders = 99;

        ctx.reset().await;
        assert_eq!(ctx.html().await, r#"<div id="navbarContainer"></div>"#);
        assert_eq!(ctx.dashboard.read().await.stats.orders, 24);
    }

    #[test]
    fn test_invalid_page_config_is_rejected() {
        let mut config = Config::default();
        config.navigation.default_page = "bad page".to_string();
        let result = AppContext::new(config, "", Arc::new(StaticSource::new()));
        assert!(result.is_err());
    }
}
