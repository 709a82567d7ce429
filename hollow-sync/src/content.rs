//! The content interface exposed to the route layer.
//!
//! Collections are addressed by name and every name is checked before the
//! store is touched. Listings come back newest first.

use hollow_model::{Fields, Record};
use hollow_storage::{CollectionRepository, Created, DocumentStore, OrderHint};
use hollow_types::{Collection, DocumentId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::SyncConfig;
use crate::controller::SyncController;
use crate::error::SyncResult;
use crate::ordering;

/// Everything the public page renders, fetched in one call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentBundle {
    pub messages: Vec<Record>,
    pub blogs: Vec<Record>,
    pub offerings: Vec<Record>,
}

/// Name-addressed CRUD over every collection of one store.
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn DocumentStore>,
    config: SyncConfig,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The repository for a collection given by name.
    pub fn repository(&self, name: &str) -> SyncResult<CollectionRepository> {
        Ok(CollectionRepository::open(self.store.clone(), name)?)
    }

    /// A fresh, unloaded controller for a collection.
    pub fn controller(&self, collection: Collection) -> SyncController {
        SyncController::new(
            CollectionRepository::new(self.store.clone(), collection),
            &self.config,
        )
    }

    /// Every record of a collection, newest first.
    pub async fn fetch_all(&self, name: &str) -> SyncResult<Vec<Record>> {
        let repo = self.repository(name)?;
        fetch_sorted(&repo).await
    }

    pub async fn create(&self, name: &str, partial: &Fields) -> SyncResult<Created> {
        let repo = self.repository(name)?;
        Ok(repo.create(partial).await?)
    }

    pub async fn get_one(&self, name: &str, id: &str) -> SyncResult<Record> {
        let repo = self.repository(name)?;
        let id = DocumentId::parse(id)?;
        Ok(repo.get_one(&id).await?)
    }

    pub async fn update_partial(&self, name: &str, id: &str, partial: &Fields) -> SyncResult<()> {
        let repo = self.repository(name)?;
        let id = DocumentId::parse(id)?;
        Ok(repo.update_partial(&id, partial).await?)
    }

    pub async fn delete(&self, name: &str, id: &str) -> SyncResult<()> {
        let repo = self.repository(name)?;
        let id = DocumentId::parse(id)?;
        Ok(repo.delete(&id).await?)
    }

    /// Fetches the three collections concurrently.
    ///
    /// Each list is ordered newest first; messages are capped at
    /// [`SyncConfig::message_limit`].
    pub async fn fetch_combined(&self) -> SyncResult<ContentBundle> {
        let messages = CollectionRepository::new(self.store.clone(), Collection::Messages);
        let blogs = CollectionRepository::new(self.store.clone(), Collection::Blogs);
        let offerings = CollectionRepository::new(self.store.clone(), Collection::Offerings);

        let (mut messages, blogs, offerings) = tokio::try_join!(
            fetch_sorted(&messages),
            fetch_sorted(&blogs),
            fetch_sorted(&offerings),
        )?;
        messages.truncate(self.config.message_limit);

        debug!(
            "Fetched {} messages, {} blogs, {} offerings",
            messages.len(),
            blogs.len(),
            offerings.len()
        );
        Ok(ContentBundle {
            messages,
            blogs,
            offerings,
        })
    }
}

async fn fetch_sorted(repo: &CollectionRepository) -> SyncResult<Vec<Record>> {
    let records = repo.get_all(Some(OrderHint::NewestFirst)).await?;
    Ok(ordering::sort_descending_by_time(records))
}
