//! Navigation error types

use thiserror::Error;

/// Navigation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Token contains characters that cannot form an element id
    #[error("Invalid page token: {0:?}")]
    InvalidToken(String),

    /// Token is well formed but not one of the configured pages
    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

/// Result type alias for navigation
pub type NavigationResult<T> = Result<T, NavigationError>;
