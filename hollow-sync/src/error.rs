//! Error types for the sync layer.

use hollow_model::ModelError;
use hollow_storage::RepositoryError;
use hollow_types::RecordId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A repository call failed, or a payload was rejected before one.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The mirror holds no live entry with this id.
    #[error("unknown record: {0}")]
    UnknownRecord(RecordId),

    /// A background mutation task ended without reporting.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl SyncError {
    /// Returns true if retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Repository(err) => err.is_transient(),
            Self::UnknownRecord(_) => false,
            Self::TaskFailed(_) => true,
        }
    }
}

impl From<ModelError> for SyncError {
    fn from(err: ModelError) -> Self {
        Self::Repository(err.into())
    }
}

impl From<hollow_types::Error> for SyncError {
    fn from(err: hollow_types::Error) -> Self {
        ModelError::from(err).into()
    }
}
