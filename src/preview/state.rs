//! Preview server state

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::fragment::{FragmentResult, FragmentSource};

/// Shared state for all preview handlers
#[derive(Clone)]
pub struct PreviewState {
    pub config: Arc<Config>,
    /// Where pages rendered by `/render/:page` take their fragments from
    pub source: Arc<dyn FragmentSource>,
    pub shell: Arc<String>,
    pub start_time: Instant,
}

impl PreviewState {
    pub fn new(config: Config) -> FragmentResult<Self> {
        let source = config.assets.fragment_source()?;
        let shell = config.assets.shell_html();
        Ok(Self::with_source(config, source, shell))
    }

    pub fn with_source(config: Config, source: Arc<dyn FragmentSource>, shell: String) -> Self {
        Self {
            config: Arc::new(config),
            source,
            shell: Arc::new(shell),
            start_time: Instant::now(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.preview.host, self.config.preview.port)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
