//! Ordered mirrors and optimistic sync for Hollow collections.
//!
//! The document store only promises eventual, at-least-available writes.
//! This crate keeps an ordered in-memory mirror of each collection in front
//! of it so the site can answer reads at once and show local changes before
//! the store confirms them.
//!
//! # Components
//!
//! - **Ordering**: most-recent-first ordering of mirror entries, stable, with
//!   undated entries last
//! - **Controller**: [`SyncController`] owns one collection's mirror, applies
//!   optimistic creates, updates and deletes, and rolls them back when the
//!   store rejects them
//! - **Queue**: background mutations for one record reach the store one at a
//!   time, in the order they were requested
//! - **Content**: [`ContentService`] is the name-addressed interface the route
//!   layer calls, including the combined fetch for the public page
//! - **Events**: [`SyncEvent`] notices broadcast to the view layer
//!
//! # Example
//!
//! ```
//! use hollow_storage::{CollectionRepository, MemoryStore};
//! use hollow_sync::{SyncConfig, SyncController};
//! use hollow_types::Collection;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let repo = CollectionRepository::new(store, Collection::Messages);
//! let controller = SyncController::new(repo, &SyncConfig::default());
//! assert!(!controller.is_loaded());
//! ```

mod config;
mod content;
mod controller;
mod error;
mod events;
mod mirror;
pub mod ordering;
mod queue;

pub use config::{SyncConfig, DEFAULT_MESSAGE_LIMIT};
pub use content::{ContentBundle, ContentService};
pub use controller::{MutationOutcome, PendingMutation, SyncController};
pub use error::{SyncError, SyncResult};
pub use events::{MutationKind, SyncEvent};
pub use mirror::MirrorEntry;
pub use ordering::{insertion_index, sort_descending_by_time, Chronological};
