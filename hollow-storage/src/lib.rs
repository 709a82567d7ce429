//! Document store layer for Hollow.
//!
//! The document store itself is an external service. This crate defines the
//! minimal capability the content layer needs from it and the per-collection
//! repository that every read and write goes through.
//!
//! # Architecture
//!
//! - [`DocumentStore`] is the capability: create, get, list, merge-update and
//!   delete of field maps in a named collection, with store-assigned ids and
//!   creation times
//! - [`CollectionRepository`] validates the collection and the payload before
//!   any I/O, routes every call through the [`FieldMapper`](hollow_model::FieldMapper),
//!   and classifies failures as permanent or transient
//! - [`MemoryStore`] is an in-process store with fault injection, used for
//!   local runs and tests

mod error;
mod memory;
mod repository;
mod store;

pub use error::{RepositoryError, RepositoryResult, StoreError, StoreResult};
pub use memory::{Fault, JournalEntry, MemoryStore, StoreOp};
pub use repository::{CollectionRepository, Created};
pub use store::{DocumentStore, OrderHint, StoredDocument};
