//! Error types for the navigation menu.

use std::fmt;
use std::path::PathBuf;

use navmenu_util::SelectorError;
use thiserror::Error;

/// Main error type for menu operations.
#[derive(Debug, Error)]
pub enum MenuError {
    /// A required element was not present when the controller mounted.
    #[error("required {role} element `#{id}` not found")]
    MissingElement { role: ElementRole, id: String },

    /// An unexpected DOM failure while toggling or wiring listeners.
    #[error("runtime fault: {0}")]
    RuntimeFault(#[from] DomError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Which required element was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Trigger,
    Panel,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRole::Trigger => f.write_str("trigger"),
            ElementRole::Panel => f.write_str("panel"),
        }
    }
}

/// Failures reported by a [`crate::dom::Dom`] implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("node is not attached to the document: {node}")]
    Detached { node: String },

    #[error("{operation} failed: {message}")]
    Host { operation: &'static str, message: String },
}

/// Errors raised while loading or validating a [`crate::config::MenuConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("failed to parse menu configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read menu configuration from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
