//! Fragment loading error types

use thiserror::Error;

/// Errors a fragment source can report
#[derive(Error, Debug)]
pub enum FragmentError {
    /// The source has no fragment at this locator
    #[error("Fragment not found: {0}")]
    NotFound(String),

    /// The source answered with a non-success status
    #[error("Fragment {locator} returned status {status}")]
    Status { locator: String, status: u16 },

    /// Locator escapes the source root or is otherwise unusable
    #[error("Invalid fragment locator: {0}")]
    InvalidLocator(String),

    /// Network failure talking to an HTTP source
    #[error("Transport error: {0}")]
    Transport(String),

    /// Filesystem failure reading a directory source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FragmentError {
    fn from(err: reqwest::Error) -> Self {
        FragmentError::Transport(err.to_string())
    }
}

/// Result type alias for fragment operations
pub type FragmentResult<T> = Result<T, FragmentError>;
