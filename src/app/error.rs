//! Application error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::fragment::FragmentError;
use crate::navigation::NavigationError;
use crate::registry::ComponentError;

/// Errors that abort boot or an event dispatch
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    /// A shell element boot depends on is absent
    #[error("Shell element #{0} not found")]
    ShellElementMissing(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
