//! Page tokens and URL fragments

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::{NavigationError, NavigationResult};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid token regex"))
}

/// Short page identifier, e.g. `dashboard`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageToken(String);

impl PageToken {
    pub fn parse(raw: &str) -> NavigationResult<Self> {
        if token_pattern().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(NavigationError::InvalidToken(raw.to_string()))
        }
    }

    /// Token from a URL fragment (`#menu`, `menu`, `#%6Denu`)
    ///
    /// An empty fragment yields `default`.
    pub fn from_hash(hash: &str, default: &PageToken) -> NavigationResult<Self> {
        let raw = hash.strip_prefix('#').unwrap_or(hash);
        if raw.is_empty() {
            return Ok(default.clone());
        }
        let decoded = urlencoding::decode(raw)
            .map_err(|_| NavigationError::InvalidToken(raw.to_string()))?;
        Self::parse(&decoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the page container element
    pub fn mount_id(&self) -> String {
        format!("{}Page", self.0)
    }

    /// Navigation target used by menu items
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PageToken {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PageToken {
    type Error = NavigationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PageToken> for String {
    fn from(token: PageToken) -> Self {
        token.0
    }
}
