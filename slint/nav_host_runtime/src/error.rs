//! Error taxonomy for command application.

use thiserror::Error;

/// A host stack or unit primitive refused or failed a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host {operation} failed: {message}")]
pub struct HostError {
    pub operation: &'static str,
    pub message: String,
}

impl HostError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Failure of a single command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("can't create a screen: {key}")]
    ViewCreation { key: String },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("mirror invariant violated for '{key}': index {index} outside stack of {len}")]
    MirrorInvariant {
        key: String,
        index: usize,
        len: usize,
    },
}

/// Failure that stopped a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("failed to synchronize with host stack: {0}")]
    Sync(#[source] HostError),
    #[error("command #{index} failed: {source}")]
    Command {
        index: usize,
        #[source]
        source: NavError,
    },
}

impl BatchError {
    /// Short machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::Sync(_) => "sync_failed",
            BatchError::Command {
                source: NavError::ViewCreation { .. },
                ..
            } => "view_creation_failed",
            BatchError::Command { .. } => "batch_failed",
        }
    }
}
