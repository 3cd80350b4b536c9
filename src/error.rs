//! Error types for node construction and mounting.

use thiserror::Error;

/// Errors surfaced by the composition engine and the root mount controller.
///
/// Reconciliation inconsistencies (removing an unknown key, re-emitting the
/// mounted node) are not errors: they are logged and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No host display system was installed on this thread.
    #[error("no host display system installed on this thread")]
    NoHost,

    /// A composition function failed before returning a node.
    #[error("component `{component}` failed to construct: {reason}")]
    Construction { component: String, reason: String },

    /// A destroyed node was passed where a live one is required.
    #[error("node was already destroyed")]
    Destroyed,
}

impl Error {
    /// Construction failure raised from inside a composition function.
    ///
    /// The engine fills in the component name when the error leaves
    /// `create_component`.
    pub fn construction(reason: impl Into<String>) -> Self {
        Error::Construction {
            component: String::new(),
            reason: reason.into(),
        }
    }

    pub(crate) fn with_component(self, name: &str) -> Self {
        match self {
            Error::Construction { component, reason } if component.is_empty() => {
                Error::Construction {
                    component: name.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
