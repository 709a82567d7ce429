//! The document store capability.

use async_trait::async_trait;
use hollow_model::Fields;
use hollow_types::{Collection, DocumentId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A document as the store holds it, in persisted field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Fields,
    /// Store-assigned creation time. `None` for documents written without
    /// one, or when the store does not report it back on create.
    pub created_at: Option<Timestamp>,
}

/// Advisory listing order. Stores may ignore it; callers sort anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderHint {
    NewestFirst,
}

/// Minimal CRUD capability over named collections.
///
/// Only eventual, at-least-available semantics are assumed: writes may land
/// in any order relative to other callers, and any call may fail with
/// [`StoreError::Unavailable`](crate::StoreError::Unavailable).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document, assigning its id and creation time.
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<StoredDocument>;

    /// Reads one document. `None` if absent.
    async fn get(&self, collection: Collection, id: &DocumentId) -> StoreResult<Option<StoredDocument>>;

    /// Reads every document of a collection.
    async fn list(
        &self,
        collection: Collection,
        hint: Option<OrderHint>,
    ) -> StoreResult<Vec<StoredDocument>>;

    /// Merges `partial` into a document. Returns false if it is absent.
    async fn merge_update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Fields,
    ) -> StoreResult<bool>;

    /// Deletes a document. Returns false if it is absent.
    async fn delete(&self, collection: Collection, id: &DocumentId) -> StoreResult<bool>;
}
