//! Component Registry
//!
//! Named components with optional lifecycle hooks (`init`, `update`,
//! `destroy`). Components are initialized once, sequentially, in
//! registration order.
//!
//! Unlike a fail-fast loop, a failing `init` hook does not stop the
//! components after it: the failure is logged and recorded in the
//! [`InitReport`], and initialization continues.

mod error;

pub use error::{ComponentError, ComponentResult};

use async_trait::async_trait;
use serde::Serialize;

use crate::app::{AppContext, UiEvent};

/// Which hooks a component implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub init: bool,
    pub update: bool,
    pub destroy: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        init: false,
        update: false,
        destroy: false,
    };

    pub const ALL: Self = Self {
        init: true,
        update: true,
        destroy: true,
    };

    pub fn with_init(mut self) -> Self {
        self.init = true;
        self
    }

    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    pub fn with_destroy(mut self) -> Self {
        self.destroy = true;
        self
    }
}

/// A dashboard widget with lifecycle hooks
///
/// Only the hooks advertised by [`Component::capabilities`] are invoked.
#[async_trait]
pub trait Component: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Id of the element the component needs before `init` may run
    fn mount_point(&self) -> Option<&str> {
        None
    }

    async fn init(&mut self, _ctx: &AppContext) -> ComponentResult<()> {
        Ok(())
    }

    async fn update(&mut self, _ctx: &AppContext, _event: &UiEvent) -> ComponentResult<()> {
        Ok(())
    }

    async fn destroy(&mut self, _ctx: &AppContext) {}
}

/// Lifecycle position of a registered component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Registered,
    Ready,
    Unmounted,
    Failed,
}

/// Whether a component's container exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountStatus {
    Ready,
    NotRequired,
    Missing(String),
}

/// Result of one registry `init` pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// True when the guard short-circuited a repeated call
    pub skipped: bool,
    pub initialized: Vec<String>,
    pub unmounted: Vec<String>,
    pub failed: Vec<(String, ComponentError)>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.unmounted.is_empty() && self.failed.is_empty()
    }
}

struct Entry {
    name: String,
    component: Box<dyn Component>,
    state: LifecycleState,
}

/// Registry of named components, kept in registration order
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<Entry>,
    initialized: bool,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a component, replacing any prior entry under the same name
    ///
    /// A replacement keeps the original registration slot. The displaced
    /// component is handed back without its `destroy` hook being called.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        component: Box<dyn Component>,
    ) -> Option<Box<dyn Component>> {
        let name = name.into();
        if self.initialized {
            tracing::warn!(component = %name, "Registered after init; hooks will not run until re-init");
        }

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.state = LifecycleState::Registered;
                Some(std::mem::replace(&mut entry.component, component))
            }
            None => {
                self.entries.push(Entry {
                    name,
                    component,
                    state: LifecycleState::Registered,
                });
                None
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.component.as_ref())
    }

    pub fn state(&self, name: &str) -> Option<LifecycleState> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.state)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Check a component's container before running its hooks
    pub async fn mount(component: &dyn Component, ctx: &AppContext) -> MountStatus {
        match component.mount_point() {
            None => MountStatus::NotRequired,
            Some(id) => {
                if ctx.document.read().await.element_by_id(id).is_some() {
                    MountStatus::Ready
                } else {
                    MountStatus::Missing(id.to_string())
                }
            }
        }
    }

    /// Initialize every component once, in registration order
    pub async fn init(&mut self, ctx: &AppContext) -> InitReport {
        if self.initialized {
            return InitReport {
                skipped: true,
                ..Default::default()
            };
        }

        let mut report = InitReport::default();

        for entry in self.entries.iter_mut() {
            if let MountStatus::Missing(id) = Self::mount(entry.component.as_ref(), ctx).await {
                tracing::warn!(component = %entry.name, mount = %id, "Mount point missing, component not initialized");
                entry.state = LifecycleState::Unmounted;
                report.unmounted.push(entry.name.clone());
                continue;
            }

            if !entry.component.capabilities().init {
                entry.state = LifecycleState::Ready;
                report.initialized.push(entry.name.clone());
                continue;
            }

            match entry.component.init(ctx).await {
                Ok(()) => {
                    tracing::info!(component = %entry.name, "Component initialized");
                    entry.state = LifecycleState::Ready;
                    report.initialized.push(entry.name.clone());
                }
                Err(e) => {
                    tracing::error!(component = %entry.name, error = %e, "Error initializing component");
                    entry.state = LifecycleState::Failed;
                    report.failed.push((entry.name.clone(), e));
                }
            }
        }

        self.initialized = true;
        tracing::info!(
            initialized = report.initialized.len(),
            failed = report.failed.len(),
            unmounted = report.unmounted.len(),
            "Component initialization finished"
        );
        report
    }

    /// Send an event to one component
    ///
    /// Returns `Ok(false)` when the component exists but has no update
    /// hook or is not ready.
    pub async fn update(
        &mut self,
        name: &str,
        ctx: &AppContext,
        event: &UiEvent,
    ) -> ComponentResult<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| ComponentError::NotRegistered(name.to_string()))?;

        if entry.state != LifecycleState::Ready || !entry.component.capabilities().update {
            return Ok(false);
        }

        entry.component.update(ctx, event).await?;
        Ok(true)
    }

    /// Send an event to every ready component, in registration order
    ///
    /// A failing handler does not stop delivery to the rest.
    pub async fn broadcast(
        &mut self,
        ctx: &AppContext,
        event: &UiEvent,
    ) -> Vec<(String, ComponentError)> {
        let mut failures = Vec::new();
        for entry in self.entries.iter_mut() {
            if entry.state != LifecycleState::Ready || !entry.component.capabilities().update {
                continue;
            }
            if let Err(e) = entry.component.update(ctx, event).await {
                failures.push((entry.name.clone(), e));
            }
        }
        failures
    }

    /// Run `destroy` (when supported) and drop the component
    pub async fn destroy(&mut self, name: &str, ctx: &AppContext) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.name == name) else {
            return false;
        };

        let mut entry = self.entries.remove(index);
        if entry.component.capabilities().destroy {
            entry.component.destroy(ctx).await;
        }
        tracing::debug!(component = %name, "Component destroyed");
        true
    }

    /// Destroy every component, newest first, and reset the init guard
    pub async fn destroy_all(&mut self, ctx: &AppContext) {
        while let Some(mut entry) = self.entries.pop() {
            if entry.component.capabilities().destroy {
                entry.component.destroy(ctx).await;
            }
        }
        self.initialized = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fragment::StaticSource;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct Probe {
        label: &'static str,
        caps: Capabilities,
        mount: Option<&'static str>,
        fail_init: bool,
        log: CallLog,
    }

    impl Probe {
        fn new(label: &'static str, log: &CallLog) -> Self {
            Self {
                label,
                caps: Capabilities::ALL,
                mount: None,
                fail_init: false,
                log: log.clone(),
            }
        }

        fn record(&self, hook: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, hook));
        }
    }

    #[async_trait]
    impl Component for Probe {
        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn mount_point(&self) -> Option<&str> {
            self.mount
        }

        async fn init(&mut self, _ctx: &AppContext) -> ComponentResult<()> {
            self.record("init");
            if self.fail_init {
                return Err(ComponentError::failed(self.label, "boom"));
            }
            Ok(())
        }

        async fn update(&mut self, _ctx: &AppContext, _event: &UiEvent) -> ComponentResult<()> {
            self.record("update");
            Ok(())
        }

        async fn destroy(&mut self, _ctx: &AppContext) {
            self.record("destroy");
        }
    }

    fn context() -> AppContext {
        AppContext::new(
            Config::default(),
            r#"<div id="navbar"></div>"#,
            Arc::new(StaticSource::new()),
        )
        .unwrap()
    }

    fn calls(log: &CallLog) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_init_runs_in_registration_order_once() {
        let ctx = context();
        let log = CallLog::default();
        let mut registry = ComponentRegistry::new();
        registry.register("b", Box::new(Probe::new("b", &log)));
        registry.register("a", Box::new(Probe::new("a", &log)));

        let report = registry.init(&ctx).await;
        assert_eq!(report.initialized, vec!["b", "a"]);
        assert_eq!(calls(&log), vec!["b:init", "a:init"]);

        let again = registry.init(&ctx).await;
        assert!(again.skipped);
        assert_eq!(calls(&log).len(), 2);
    }

    #[tokio::test]
    async fn test_failing_init_does_not_stop_later_components() {
        let ctx = context();
        let log = CallLog::default();
        let mut registry = ComponentRegistry::new();

        let mut broken = Probe::new("navbar", &log);
        broken.fail_init = true;
        registry.register("navbar", Box::new(broken));
        registry.register("dashboard", Box::new(Probe::new("dashboard", &log)));

        let report = registry.init(&ctx).await;
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "navbar");
        assert_eq!(report.initialized, vec!["dashboard"]);
        assert_eq!(registry.state("navbar"), Some(LifecycleState::Failed));
        assert_eq!(calls(&log), vec!["navbar:init", "dashboard:init"]);
    }

    #[tokio::test]
    async fn test_second_registration_replaces_first() {
        let ctx = context();
        let first_log = CallLog::default();
        let second_log = CallLog::default();
        let mut registry = ComponentRegistry::new();

        assert!(registry
            .register("navbar", Box::new(Probe::new("first", &first_log)))
            .is_none());
        let displaced = registry.register("navbar", Box::new(Probe::new("second", &second_log)));
        assert!(displaced.is_some());
        assert_eq!(registry.len(), 1);

        registry.init(&ctx).await;
        assert!(registry.update("navbar", &ctx, &UiEvent::Refresh).await.unwrap());
        assert!(registry.destroy("navbar", &ctx).await);

        assert!(calls(&first_log).is_empty());
        assert_eq!(
            calls(&second_log),
            vec!["second:init", "second:update", "second:destroy"]
        );
        assert!(!registry.contains("navbar"));
    }

    #[tokio::test]
    async fn test_missing_mount_point_is_reported_not_awaited() {
        let ctx = context();
        let log = CallLog::default();
        let mut registry = ComponentRegistry::new();

        let mut sidebar = Probe::new("sidebar", &log);
        sidebar.mount = Some("sidebar");
        let mut navbar = Probe::new("navbar", &log);
        navbar.mount = Some("navbar");
        registry.register("sidebar", Box::new(sidebar));
        registry.register("navbar", Box::new(navbar));

        let report = registry.init(&ctx).await;
        assert_eq!(report.unmounted, vec!["sidebar"]);
        assert_eq!(report.initialized, vec!["navbar"]);
        assert_eq!(calls(&log), vec!["navbar:init"]);

        // Not ready, so events are not delivered
        assert!(!registry.update("sidebar", &ctx, &UiEvent::ToggleSidebar).await.unwrap());
    }

    #[tokio::test]
    async fn test_hooks_respect_capabilities() {
        let ctx = context();
        let log = CallLog::default();
        let mut registry = ComponentRegistry::new();

        let mut passive = Probe::new("footer", &log);
        passive.caps = Capabilities::NONE.with_init();
        registry.register("footer", Box::new(passive));

        registry.init(&ctx).await;
        assert!(!registry.update("footer", &ctx, &UiEvent::Refresh).await.unwrap());
        registry.destroy_all(&ctx).await;

        assert_eq!(calls(&log), vec!["footer:init"]);
        assert!(registry.is_empty());
        assert!(!registry.is_initialized());
    }

    #[tokio::test]
    async fn test_broadcast_skips_components_that_are_not_ready() {
        let ctx = context();
        let log = CallLog::default();
        let mut registry = ComponentRegistry::new();

        let mut broken = Probe::new("broken", &log);
        broken.fail_init = true;
        registry.register("broken", Box::new(broken));
        registry.register("ok", Box::new(Probe::new("ok", &log)));
        registry.init(&ctx).await;

        let failures = registry.broadcast(&ctx, &UiEvent::Refresh).await;
        assert!(failures.is_empty());
        assert_eq!(calls(&log), vec!["broken:init", "ok:init", "ok:update"]);
    }

    #[tokio::test]
    async fn test_update_unknown_component() {
        let ctx = context();
        let mut registry = ComponentRegistry::new();
        let err = registry
            .update("ghost", &ctx, &UiEvent::Refresh)
            .await
            .unwrap_err();
        assert_eq!(err, ComponentError::NotRegistered("ghost".to_string()));
    }
}
