//! Fragment Sources
//!
//! Where fragment markup comes from: a directory on disk, an HTTP base
//! URL, or an in-memory table (the embedded default assets).

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::error::{FragmentError, FragmentResult};

/// Anything that can resolve a relative locator to fragment markup
#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Fetch the markup at `locator` (e.g. `includes/navbar.html`)
    async fn fetch(&self, locator: &str) -> FragmentResult<String>;
}

/// Reject absolute locators and any that climb out of the root
fn checked_relative(locator: &str) -> FragmentResult<PathBuf> {
    let path = Path::new(locator);
    let clean = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if locator.is_empty() || !clean {
        return Err(FragmentError::InvalidLocator(locator.to_string()));
    }
    Ok(path.to_path_buf())
}

/// Fragments read from a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FragmentSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    async fn fetch(&self, locator: &str) -> FragmentResult<String> {
        let path = self.root.join(checked_relative(locator)?);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => Ok(html),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FragmentError::NotFound(locator.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Fragments fetched from a web server
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> FragmentResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, locator: &str) -> String {
        format!("{}/{}", self.base_url, locator.trim_start_matches('/'))
    }
}

#[async_trait]
impl FragmentSource for HttpSource {
    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }

    async fn fetch(&self, locator: &str) -> FragmentResult<String> {
        checked_relative(locator)?;
        let response = self.client.get(self.url_for(locator)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FragmentError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Fragments held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    fragments: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a fragment
    pub fn with(mut self, locator: impl Into<String>, html: impl Into<String>) -> Self {
        self.fragments.insert(locator.into(), html.into());
        self
    }

    /// The default fragments shipped in `assets/`
    pub fn builtin() -> Self {
        Self::new()
            .with("includes/navbar.html", include_str!("../../assets/includes/navbar.html"))
            .with("includes/sidebar.html", include_str!("../../assets/includes/sidebar.html"))
            .with("includes/footer.html", include_str!("../../assets/includes/footer.html"))
            .with("pages/dashboard.html", include_str!("../../assets/pages/dashboard.html"))
            .with("pages/menu.html", include_str!("../../assets/pages/menu.html"))
            .with("pages/pesanan.html", include_str!("../../assets/pages/pesanan.html"))
            .with("pages/struk.html", include_str!("../../assets/pages/struk.html"))
    }

    pub fn locators(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fragments.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[async_trait]
impl FragmentSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} fragments)", self.fragments.len())
    }

    async fn fetch(&self, locator: &str) -> FragmentResult<String> {
        self.fragments
            .get(locator)
            .cloned()
            .ok_or_else(|| FragmentError::NotFound(locator.to_string()))
    }
}
