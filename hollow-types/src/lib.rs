//! Core type definitions for Hollow.
//!
//! This crate defines the small, store-agnostic types shared by every layer
//! of the content stack:
//! - [`Collection`]: the fixed set of named collections in the document store
//! - Record identifiers: store-assigned [`DocumentId`], temporary [`LocalId`],
//!   and the [`RecordId`] union the in-memory mirror works with
//! - [`Timestamp`]: a hybrid logical timestamp used both for store-assigned
//!   creation times and for provisional local times

mod collection;
mod ids;
mod timestamp;

pub use collection::Collection;
pub use ids::{DocumentId, LocalId, RecordId};
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid collection: {0}")]
    InvalidCollection(String),

    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
