//! In-process document store.
//!
//! Keeps documents in insertion order per collection and stamps each create
//! with a strictly increasing [`Timestamp`]. Faults can be scripted per
//! operation so callers can exercise slow and failing writes.

use async_trait::async_trait;
use hollow_model::Fields;
use hollow_types::{Collection, DocumentId, Timestamp};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, OrderHint, StoredDocument};

/// The operations of the store capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Create,
    Get,
    List,
    Update,
    Delete,
}

/// A scripted fault for the next call of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Fail with [`StoreError::Unavailable`].
    Fail,
    /// Wait before serving the call.
    Delay(Duration),
    /// Wait, then fail.
    DelayThenFail(Duration),
}

/// A write that reached the store, in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub op: StoreOp,
    pub collection: Collection,
    pub id: DocumentId,
    pub fields: Fields,
}

#[derive(Debug)]
struct Inner {
    collections: HashMap<Collection, Vec<StoredDocument>>,
    faults: HashMap<StoreOp, VecDeque<Fault>>,
    calls: HashMap<StoreOp, usize>,
    journal: Vec<JournalEntry>,
    clock: Timestamp,
    available: bool,
    report_create_time: bool,
}

/// A [`DocumentStore`] held in memory.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                collections: HashMap::new(),
                faults: HashMap::new(),
                calls: HashMap::new(),
                journal: Vec::new(),
                clock: Timestamp::new(0, 0),
                available: true,
                report_create_time: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts a document directly, bypassing faults, counters and the
    /// journal. `created_at` may be `None` to model legacy documents.
    pub fn insert_raw(
        &self,
        collection: Collection,
        fields: Fields,
        created_at: Option<Timestamp>,
    ) -> DocumentId {
        let id = DocumentId::generate();
        let mut inner = self.lock();
        inner.collections.entry(collection).or_default().push(StoredDocument {
            id: id.clone(),
            fields,
            created_at,
        });
        id
    }

    /// Queues a fault for the next call of `op`.
    pub fn push_fault(&self, op: StoreOp, fault: Fault) {
        self.lock().faults.entry(op).or_default().push_back(fault);
    }

    /// The next call of `op` fails.
    pub fn fail_next(&self, op: StoreOp) {
        self.push_fault(op, Fault::Fail);
    }

    /// The next call of `op` waits `delay` before it is served.
    pub fn delay_next(&self, op: StoreOp, delay: Duration) {
        self.push_fault(op, Fault::Delay(delay));
    }

    /// While unavailable, every call fails.
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    /// Whether create responses carry the assigned creation time.
    pub fn set_report_create_time(&self, report: bool) {
        self.lock().report_create_time = report;
    }

    /// Number of calls made for `op`, including failed ones.
    pub fn calls(&self, op: StoreOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Total number of calls across all operations.
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Writes applied so far, in order.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.clone()
    }

    /// A copy of the stored documents of a collection, in insertion order.
    pub fn documents(&self, collection: Collection) -> Vec<StoredDocument> {
        self.lock()
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Counts the call and plays any scripted fault for it.
    async fn enter(&self, op: StoreOp) -> StoreResult<()> {
        let (fault, available) = {
            let mut inner = self.lock();
            *inner.calls.entry(op).or_insert(0) += 1;
            let fault = inner.faults.get_mut(&op).and_then(VecDeque::pop_front);
            (fault, inner.available)
        };

        match fault {
            Some(Fault::Delay(delay)) => tokio::time::sleep(delay).await,
            Some(Fault::DelayThenFail(delay)) => {
                tokio::time::sleep(delay).await;
                return Err(StoreError::Unavailable(format!("{op:?} failed (scripted)")));
            }
            Some(Fault::Fail) => {
                return Err(StoreError::Unavailable(format!("{op:?} failed (scripted)")));
            }
            None => {}
        }

        if available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store offline".into()))
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<StoredDocument> {
        self.enter(StoreOp::Create).await?;

        let mut inner = self.lock();
        let created_at = inner.clock.tick();
        inner.clock = created_at;
        let doc = StoredDocument {
            id: DocumentId::generate(),
            fields,
            created_at: Some(created_at),
        };
        inner.journal.push(JournalEntry {
            op: StoreOp::Create,
            collection,
            id: doc.id.clone(),
            fields: doc.fields.clone(),
        });
        inner.collections.entry(collection).or_default().push(doc.clone());
        debug!("Created {} document {}", collection, doc.id);

        let mut response = doc;
        if !inner.report_create_time {
            response.created_at = None;
        }
        Ok(response)
    }

    async fn get(&self, collection: Collection, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        self.enter(StoreOp::Get).await?;

        let inner = self.lock();
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| &d.id == id))
            .cloned())
    }

    async fn list(
        &self,
        collection: Collection,
        hint: Option<OrderHint>,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.enter(StoreOp::List).await?;

        let mut docs = self.documents(collection);
        if hint == Some(OrderHint::NewestFirst) {
            docs.reverse();
        }
        Ok(docs)
    }

    async fn merge_update(
        &self,
        collection: Collection,
        id: &DocumentId,
        partial: Fields,
    ) -> StoreResult<bool> {
        self.enter(StoreOp::Update).await?;

        let mut inner = self.lock();
        let Some(doc) = inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| &d.id == id))
        else {
            return Ok(false);
        };
        for (name, value) in &partial {
            doc.fields.insert(name.clone(), value.clone());
        }
        inner.journal.push(JournalEntry {
            op: StoreOp::Update,
            collection,
            id: id.clone(),
            fields: partial,
        });
        Ok(true)
    }

    async fn delete(&self, collection: Collection, id: &DocumentId) -> StoreResult<bool> {
        self.enter(StoreOp::Delete).await?;

        let mut inner = self.lock();
        let Some(docs) = inner.collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| &d.id != id);
        if docs.len() == before {
            return Ok(false);
        }
        inner.journal.push(JournalEntry {
            op: StoreOp::Delete,
            collection,
            id: id.clone(),
            fields: Fields::new(),
        });
        Ok(true)
    }
}
