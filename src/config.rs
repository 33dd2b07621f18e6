//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `CANTEEN_*` environment variable
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::fragment::{DirectorySource, FragmentResult, FragmentSource, HttpSource, StaticSource};
use crate::navigation::{NavigationResult, PageToken};

/// Shell page used when the asset directory has no `index.html`
pub const BUILTIN_SHELL: &str = include_str!("../assets/index.html");

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the shell and fragments are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory holding `index.html`, `includes/` and `pages/`
    #[serde(default = "default_assets_root")]
    pub root: String,

    /// Fetch fragments over HTTP instead of from `root`
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_assets_root() -> String {
    "./assets".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            base_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl AssetsConfig {
    /// HTTP source when a base URL is set, the asset directory when it
    /// exists, the embedded assets otherwise
    pub fn fragment_source(&self) -> FragmentResult<Arc<dyn FragmentSource>> {
        if let Some(base_url) = &self.base_url {
            let source = HttpSource::new(base_url, Duration::from_secs(self.fetch_timeout_secs))?;
            return Ok(Arc::new(source));
        }

        let root = Path::new(&self.root);
        if root.is_dir() {
            Ok(Arc::new(DirectorySource::new(root)))
        } else {
            tracing::debug!(root = %self.root, "Asset directory missing, using embedded fragments");
            Ok(Arc::new(StaticSource::builtin()))
        }
    }

    /// The shell document: `<root>/index.html` or the embedded shell
    pub fn shell_html(&self) -> String {
        let path = Path::new(&self.root).join("index.html");
        match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(_) => BUILTIN_SHELL.to_string(),
        }
    }
}

/// Page set and transition timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_page")]
    pub default_page: String,

    #[serde(default = "default_pages")]
    pub pages: Vec<String>,

    /// Delay between revealing a page and marking it active
    #[serde(default = "default_transition_delay")]
    pub transition_delay_ms: u64,
}

fn default_page() -> String {
    "dashboard".to_string()
}

fn default_pages() -> Vec<String> {
    ["dashboard", "menu", "pesanan", "struk"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_transition_delay() -> u64 {
    10
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            default_page: default_page(),
            pages: default_pages(),
            transition_delay_ms: default_transition_delay(),
        }
    }
}

impl NavigationConfig {
    pub fn default_token(&self) -> NavigationResult<PageToken> {
        PageToken::parse(&self.default_page)
    }

    pub fn page_tokens(&self) -> NavigationResult<Vec<PageToken>> {
        self.pages.iter().map(|p| PageToken::parse(p)).collect()
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

/// Simulated latencies and toast lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Time the loading screen stays up after boot
    #[serde(default = "default_loading_delay")]
    pub loading_delay_ms: u64,

    #[serde(default = "default_refresh_latency")]
    pub refresh_latency_ms: u64,

    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,

    /// Pause between the logout toast and the session reload
    #[serde(default = "default_logout_delay")]
    pub logout_delay_ms: u64,
}

fn default_loading_delay() -> u64 {
    500
}

fn default_refresh_latency() -> u64 {
    1000
}

fn default_toast_duration() -> u64 {
    3000
}

fn default_logout_delay() -> u64 {
    1000
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            loading_delay_ms: default_loading_delay(),
            refresh_latency_ms: default_refresh_latency(),
            toast_duration_ms: default_toast_duration(),
            logout_delay_ms: default_logout_delay(),
        }
    }
}

impl UiConfig {
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn refresh_latency(&self) -> Duration {
        Duration::from_millis(self.refresh_latency_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }

    /// All delays zeroed, for one-shot rendering
    pub fn instant() -> Self {
        Self {
            loading_delay_ms: 0,
            refresh_latency_ms: 0,
            toast_duration_ms: default_toast_duration(),
            logout_delay_ms: 0,
        }
    }
}

/// Preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8084
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8084".to_string(),
        "http://127.0.0.1:8084".to_string(),
    ]
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("canteen").join("config.toml")),
            Some(PathBuf::from("/etc/canteen/config.toml")),
            Some(PathBuf::from("./canteen.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Reject page tokens that could never match a container id
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.navigation
            .default_token()
            .and_then(|_| self.navigation.page_tokens())
            .map(|_| ())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Assets
        if let Some(root) = lookup("CANTEEN_ASSETS_DIR") {
            self.assets.root = root;
        }
        if let Some(url) = lookup("CANTEEN_ASSETS_URL") {
            self.assets.base_url = Some(url).filter(|u| !u.is_empty());
        }

        // Navigation
        if let Some(page) = lookup("CANTEEN_DEFAULT_PAGE") {
            if PageToken::parse(&page).is_ok() {
                self.navigation.default_page = page;
            }
        }

        // UI timings
        if let Some(ms) = lookup("CANTEEN_LOADING_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.ui.loading_delay_ms = ms;
        }
        if let Some(ms) = lookup("CANTEEN_REFRESH_LATENCY_MS").and_then(|v| v.parse().ok()) {
            self.ui.refresh_latency_ms = ms;
        }
        if let Some(ms) = lookup("CANTEEN_LOGOUT_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.ui.logout_delay_ms = ms;
        }

        // Preview server
        if let Some(host) = lookup("CANTEEN_PREVIEW_HOST") {
            self.preview.host = host;
        }
        if let Some(port) = lookup("CANTEEN_PREVIEW_PORT").and_then(|v| v.parse().ok()) {
            self.preview.port = port;
        }

        // Logging
        if let Some(level) = lookup("CANTEEN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CANTEEN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# CanteenApps Configuration
#
# Environment variables override these settings:
# - CANTEEN_ASSETS_DIR
# - CANTEEN_ASSETS_URL
# - CANTEEN_DEFAULT_PAGE
# - CANTEEN_LOADING_DELAY_MS
# - CANTEEN_REFRESH_LATENCY_MS
# - CANTEEN_LOGOUT_DELAY_MS
# - CANTEEN_PREVIEW_HOST
# - CANTEEN_PREVIEW_PORT
# - CANTEEN_LOG_LEVEL
# - CANTEEN_LOG_FORMAT

[assets]
# Directory with index.html, includes/ and pages/
# (the embedded copies are used when it does not exist)
root = "./assets"

# Fetch fragments from a web server instead
# base_url = "http://localhost:8084"

# Fragment fetch timeout in seconds
fetch_timeout_secs = 10

[navigation]
# Page shown when the URL has no fragment
default_page = "dashboard"

# Pages loaded at boot, each into #<page>Page
pages = ["dashboard", "menu", "pesanan", "struk"]

# Delay before a revealed page is marked active (ms)
transition_delay_ms = 10

[ui]
# How long the loading screen stays up after boot (ms)
loading_delay_ms = 500

# Simulated latency of the dashboard refresh (ms)
refresh_latency_ms = 1000

# How long a toast stays visible (ms)
toast_duration_ms = 3000

# Pause between the logout toast and the reload (ms)
logout_delay_ms = 1000

[preview]
# Preview server host
host = "127.0.0.1"

# Preview server port
port = 8084

# Allowed CORS origins
cors_origins = ["http://localhost:8084", "http://127.0.0.1:8084"]

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
