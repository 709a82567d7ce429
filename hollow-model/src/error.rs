//! Error types for the record model.

use hollow_types::Collection;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by field mapping and validation. All are permanent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Collection name outside the fixed set.
    #[error("invalid collection: {0}")]
    InvalidCollection(String),

    /// A required field is missing or blank, or the payload is unusable.
    #[error("validation failed for {collection}: {reason}")]
    Validation {
        collection: Collection,
        reason: String,
    },

    /// A value that could not be interpreted (bad id, bad timestamp).
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ModelError {
    pub(crate) fn validation(collection: Collection, reason: impl Into<String>) -> Self {
        Self::Validation {
            collection,
            reason: reason.into(),
        }
    }
}

impl From<hollow_types::Error> for ModelError {
    fn from(err: hollow_types::Error) -> Self {
        match err {
            hollow_types::Error::InvalidCollection(name) => Self::InvalidCollection(name),
            other => Self::InvalidValue(other.to_string()),
        }
    }
}
