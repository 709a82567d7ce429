//! Per-collection CRUD over a [`DocumentStore`].
//!
//! Callers speak the external field vocabulary; the repository translates
//! through the collection's [`FieldMapper`] in both directions and rejects
//! bad collection names and payloads before touching the store.

use hollow_model::{CollectionSchema, FieldMapper, Fields, Record};
use hollow_types::{Collection, DocumentId, Timestamp};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{RepositoryError, RepositoryResult};
use crate::store::{DocumentStore, OrderHint, StoredDocument};

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub id: DocumentId,
    /// Authoritative creation time, when the store reports it.
    pub created_at: Option<Timestamp>,
}

/// CRUD operations against one named collection.
#[derive(Clone)]
pub struct CollectionRepository {
    store: Arc<dyn DocumentStore>,
    mapper: FieldMapper,
    schema: &'static CollectionSchema,
}

impl std::fmt::Debug for CollectionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionRepository")
            .field("collection", &self.collection())
            .finish_non_exhaustive()
    }
}

impl CollectionRepository {
    /// Creates a repository for a known collection.
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self {
            store,
            mapper: FieldMapper::new(collection),
            schema: CollectionSchema::of(collection),
        }
    }

    /// Creates a repository for a collection given by name.
    ///
    /// Unknown names fail with [`RepositoryError::InvalidCollection`]; the
    /// store is not contacted.
    pub fn open(store: Arc<dyn DocumentStore>, name: &str) -> RepositoryResult<Self> {
        let mapper = FieldMapper::for_name(name)?;
        Ok(Self::new(store, mapper.collection()))
    }

    pub fn collection(&self) -> Collection {
        self.mapper.collection()
    }

    pub fn schema(&self) -> &'static CollectionSchema {
        self.schema
    }

    fn to_record(&self, doc: StoredDocument) -> Record {
        Record::new(doc.id, self.mapper.to_external(&doc.fields), doc.created_at)
    }

    fn not_found(&self, id: &DocumentId) -> RepositoryError {
        RepositoryError::NotFound {
            collection: self.collection(),
            id: id.to_string(),
        }
    }

    fn log_failure(&self, op: &str, err: &RepositoryError) {
        if err.is_transient() {
            warn!("{} {} failed: {}", self.collection(), op, err);
        }
    }

    /// Creates a document from an external partial record.
    pub async fn create(&self, partial: &Fields) -> RepositoryResult<Created> {
        self.schema.validate_create(partial)?;

        let persisted = self.mapper.to_persisted(partial);
        let doc = self
            .store
            .create(self.collection(), persisted)
            .await
            .map_err(RepositoryError::from)
            .inspect_err(|e| self.log_failure("create", e))?;

        debug!("Created {} document {}", self.collection(), doc.id);
        Ok(Created {
            id: doc.id,
            created_at: doc.created_at,
        })
    }

    /// Reads one document.
    pub async fn get_one(&self, id: &DocumentId) -> RepositoryResult<Record> {
        let doc = self
            .store
            .get(self.collection(), id)
            .await
            .map_err(RepositoryError::from)
            .inspect_err(|e| self.log_failure("get", e))?;

        match doc {
            Some(doc) => Ok(self.to_record(doc)),
            None => Err(self.not_found(id)),
        }
    }

    /// Reads every document, unordered. `hint` is passed to the store as advice.
    pub async fn get_all(&self, hint: Option<OrderHint>) -> RepositoryResult<Vec<Record>> {
        let docs = self
            .store
            .list(self.collection(), hint)
            .await
            .map_err(RepositoryError::from)
            .inspect_err(|e| self.log_failure("list", e))?;

        debug!("Listed {} {} documents", docs.len(), self.collection());
        Ok(docs.into_iter().map(|d| self.to_record(d)).collect())
    }

    /// Merges the fields present in `partial` into a document. Absent fields
    /// keep their stored values.
    pub async fn update_partial(&self, id: &DocumentId, partial: &Fields) -> RepositoryResult<()> {
        self.schema.validate_update(partial)?;

        let persisted = self.mapper.to_persisted(partial);
        let found = self
            .store
            .merge_update(self.collection(), id, persisted)
            .await
            .map_err(RepositoryError::from)
            .inspect_err(|e| self.log_failure("update", e))?;

        if found {
            debug!("Updated {} document {}", self.collection(), id);
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    /// Deletes a document.
    pub async fn delete(&self, id: &DocumentId) -> RepositoryResult<()> {
        let found = self
            .store
            .delete(self.collection(), id)
            .await
            .map_err(RepositoryError::from)
            .inspect_err(|e| self.log_failure("delete", e))?;

        if found {
            debug!("Deleted {} document {}", self.collection(), id);
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }
}
