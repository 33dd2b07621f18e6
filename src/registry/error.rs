//! Component lifecycle error types

use thiserror::Error;

/// Errors raised by component hooks or registry lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The component's container is not in the document
    #[error("Mount point #{0} not found")]
    MountMissing(String),

    /// No component is registered under this name
    #[error("Component not registered: {0}")]
    NotRegistered(String),

    /// A hook failed
    #[error("Component {component} failed: {reason}")]
    Failed { component: String, reason: String },
}

impl ComponentError {
    pub fn failed(component: &str, reason: impl Into<String>) -> Self {
        ComponentError::Failed {
            component: component.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for component hooks
pub type ComponentResult<T> = Result<T, ComponentError>;
