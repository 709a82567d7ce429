//! Error types for the interaction layer.

use hollow_sync::SyncError;
use thiserror::Error;

use crate::machine::{Action, Stage};

/// Result type for interaction operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors raised by the interaction state machine and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The action is not available in the current stage. Nothing changed.
    #[error("cannot {action} while {stage}")]
    InvalidTransition { action: Action, stage: Stage },

    /// The draft is empty or whitespace only. Nothing was sent.
    #[error("nothing to submit")]
    EmptySubmission,

    /// The sync layer rejected the request.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading a [`SiteConfig`](crate::SiteConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
