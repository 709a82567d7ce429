//! Error types for the storage layer.

use hollow_model::ModelError;
use hollow_types::Collection;
use thiserror::Error;

/// Result type for raw store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the call. Transient.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur in repository operations.
///
/// Everything except [`RepositoryError::StoreUnavailable`] is permanent and
/// will fail the same way if retried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Collection name outside the fixed set. Raised before any I/O.
    #[error("invalid collection: {0}")]
    InvalidCollection(String),

    /// Missing or blank required field. Raised before any I/O.
    #[error("validation failed for {collection}: {reason}")]
    Validation {
        collection: Collection,
        reason: String,
    },

    /// An id or value the store cannot address. Raised before any I/O.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The targeted document does not exist.
    #[error("{collection} document not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// Transient infrastructure failure.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl RepositoryError {
    /// Returns true if retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }
}

impl From<ModelError> for RepositoryError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCollection(name) => Self::InvalidCollection(name),
            ModelError::Validation { collection, reason } => {
                Self::Validation { collection, reason }
            }
            ModelError::InvalidValue(reason) => Self::InvalidValue(reason),
        }
    }
}
