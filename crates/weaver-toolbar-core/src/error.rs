//! Error types for toolbar setup and host operations.

use thiserror::Error;

/// Failure reported by a [`ToolbarHost`](crate::ToolbarHost) operation.
///
/// Hosts wrap whatever their platform gives them (usually a stringified
/// `JsValue`) into a message. These never escape a handler; the toolbar logs
/// them and leaves the document untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError(s.to_string())
    }
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError(s)
    }
}

/// Errors raised while setting up a toolbar instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ToolbarError {
    /// The placement container selector matched nothing.
    #[error("toolbar container not found: {0}")]
    ContainerNotFound(String),

    /// The tracked content selector matched nothing.
    #[error("content region not found: {0}")]
    ContentNotFound(String),

    /// No element carries the configured toolbar id.
    #[error("toolbar root not found: #{0}")]
    ToolbarRootNotFound(String),

    /// The configuration itself is unusable.
    #[error("invalid toolbar config: {0}")]
    Config(String),

    /// A host operation failed during setup.
    #[error(transparent)]
    Host(#[from] HostError),
}
