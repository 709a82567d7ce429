//! Optimistic sync of one collection mirror.
//!
//! The controller owns an ordered in-memory mirror of a collection. Reads
//! are served from the mirror. Local mutations patch the mirror at once and
//! are sent to the store by a background task; when the store rejects one,
//! the patch is rolled back and a single [`SyncEvent::RolledBack`] is
//! broadcast.
//!
//! The mirror lock is never held across an `.await`.

use hollow_model::{Fields, PriorValues, Record};
use hollow_storage::{CollectionRepository, Created, OrderHint, RepositoryError};
use hollow_types::{Collection, DocumentId, LocalId, RecordId, Timestamp};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::events::{MutationKind, SyncEvent};
use crate::mirror::MirrorEntry;
use crate::ordering::{self, Chronological};
use crate::queue::{MutationQueue, Ticket};

/// How a background mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The store accepted it. Carries the record's id afterwards.
    Confirmed(RecordId),
    /// The store rejected it and the mirror was restored.
    RolledBack(SyncError),
    /// It targeted a record whose create failed, so it never reached the
    /// store. No notice is broadcast for it.
    Superseded,
}

impl MutationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Handle to a mutation running in the background.
///
/// The mirror already reflects the mutation. Awaiting the handle is
/// optional; dropping it does not cancel the store call.
#[derive(Debug)]
pub struct PendingMutation {
    id: RecordId,
    kind: MutationKind,
    handle: JoinHandle<MutationOutcome>,
}

impl PendingMutation {
    /// The id the mutation was issued for. For a create, the temporary id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    /// Waits for the store's answer and the reconciliation that follows it.
    pub async fn settled(self) -> MutationOutcome {
        self.handle
            .await
            .unwrap_or_else(|e| MutationOutcome::RolledBack(SyncError::TaskFailed(e.to_string())))
    }
}

/// A locally deleted entry, kept until the store confirms the delete.
#[derive(Debug)]
struct Tombstone {
    entry: MirrorEntry,
    index: usize,
}

struct State {
    mirror: Vec<MirrorEntry>,
    queue: MutationQueue,
    /// Keyed by the sequence number of the delete that made them.
    tombstones: HashMap<u64, Tombstone>,
    /// Live only while mutations addressed to the temporary id are queued.
    aliases: HashMap<LocalId, DocumentId>,
    /// Bumped each time a mutation settles against the store.
    generation: u64,
    /// Generation at which each record last settled. Only kept while a load
    /// is in flight.
    settled: HashMap<RecordId, u64>,
    loads_in_flight: usize,
    clock: Timestamp,
    next_local: u64,
    loaded: bool,
    issued_loads: u64,
    applied_load: u64,
}

impl State {
    fn new() -> Self {
        Self {
            mirror: Vec::new(),
            queue: MutationQueue::default(),
            tombstones: HashMap::new(),
            aliases: HashMap::new(),
            generation: 0,
            settled: HashMap::new(),
            loads_in_flight: 0,
            clock: Timestamp::now(),
            next_local: 0,
            loaded: false,
            issued_loads: 0,
            applied_load: 0,
        }
    }

    /// Follows a confirmed temporary id to its store id.
    fn resolve(&self, id: &RecordId) -> RecordId {
        match id {
            RecordId::Local(local) => match self.aliases.get(local) {
                Some(stored) => RecordId::Stored(stored.clone()),
                None => id.clone(),
            },
            RecordId::Stored(_) => id.clone(),
        }
    }

    /// Ends mutation `seq` in the queue and forgets aliases nothing queued
    /// refers to anymore.
    fn release(&mut self, seq: u64) {
        self.queue.release(seq);
        self.aliases
            .retain(|local, _| self.queue.is_busy(&RecordId::Local(*local)));
    }

    /// Records that the store has answered a mutation of `id`, so listings
    /// taken before now do not override the mirror for it.
    fn mark_settled(&mut self, id: RecordId) {
        self.generation += 1;
        if self.loads_in_flight > 0 {
            self.settled.insert(id, self.generation);
        }
    }

    /// Bookkeeping once a load's response is in, applied or not.
    fn finish_load(&mut self) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        if self.loads_in_flight == 0 {
            self.settled.clear();
        }
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.mirror.iter().position(|e| &e.record.id == id)
    }

    fn tombstone_mut(&mut self, id: &RecordId) -> Option<&mut Tombstone> {
        self.tombstones
            .values_mut()
            .find(|t| &t.entry.record.id == id)
    }

    fn insert_sorted(&mut self, entry: MirrorEntry) {
        let index = ordering::insertion_index(&self.mirror, entry.sort_time());
        self.mirror.insert(index, entry);
    }

    /// Replaces the mirror with a listing requested at generation `since`.
    /// Returns the new size.
    ///
    /// Records whose mutations settled after `since`, or are still queued,
    /// keep their mirror state: the listing may predate those writes.
    fn replace(&mut self, records: Vec<Record>, ticket: u64, since: u64) -> usize {
        let deleted: HashSet<RecordId> = self
            .tombstones
            .values()
            .map(|t| t.entry.record.id.clone())
            .collect();
        let newer: HashSet<RecordId> = self
            .settled
            .iter()
            .filter(|(_, generation)| **generation > since)
            .map(|(id, _)| id.clone())
            .collect();

        let mut previous: HashMap<RecordId, MirrorEntry> = std::mem::take(&mut self.mirror)
            .into_iter()
            .map(|e| (e.record.id.clone(), e))
            .collect();

        let mut mirror = Vec::with_capacity(records.len() + previous.len());
        for record in records {
            if deleted.contains(&record.id) {
                continue;
            }
            let local = previous.remove(&record.id);
            let fields = if newer.contains(&record.id) || self.queue.is_busy(&record.id) {
                match local {
                    Some(local) => local.record.fields,
                    // Deleted after the listing was taken.
                    None if newer.contains(&record.id) => continue,
                    None => record.fields,
                }
            } else {
                record.fields
            };
            mirror.push(MirrorEntry::confirmed(Record::new(
                record.id,
                fields,
                record.created_at,
            )));
        }

        if let Some(newest) = mirror.iter().filter_map(|e| e.record.created_at).max() {
            self.clock = self.clock.observe(&newest);
        }

        // Unconfirmed creates, and creates confirmed after the listing.
        mirror.extend(
            previous
                .into_values()
                .filter(|e| e.is_local() || newer.contains(&e.record.id)),
        );
        ordering::sort_in_place(&mut mirror);

        self.mirror = mirror;
        self.loaded = true;
        self.applied_load = ticket;
        self.settled.retain(|_, generation| *generation > since);
        self.mirror.len()
    }

    fn confirm_create(&mut self, local: LocalId, created: Created) -> RecordId {
        let temp = RecordId::Local(local);
        let id = RecordId::Stored(created.id.clone());
        self.aliases.insert(local, created.id);
        self.queue.alias(&temp, id.clone());

        if let Some(at) = created.created_at {
            self.clock = self.clock.observe(&at);
        }

        let confirm = |entry: &mut MirrorEntry| {
            entry.record.id = id.clone();
            if created.created_at.is_some() {
                entry.record.created_at = created.created_at;
                entry.provisional_at = None;
            }
        };

        if let Some(index) = self.position(&temp) {
            confirm(&mut self.mirror[index]);
            if !ordering::is_sorted(&self.mirror) {
                ordering::sort_in_place(&mut self.mirror);
            }
        } else if let Some(tombstone) = self.tombstone_mut(&temp) {
            confirm(&mut tombstone.entry);
        }
        id
    }

    fn discard_create(&mut self, local: LocalId) {
        let temp = RecordId::Local(local);
        self.mirror.retain(|e| e.record.id != temp);
        self.tombstones.retain(|_, t| t.entry.record.id != temp);
    }

    fn revert_update(&mut self, id: &RecordId, prior: &PriorValues, written: &Fields) {
        if let Some(index) = self.position(id) {
            prior.restore(&mut self.mirror[index].record.fields, written);
        } else if let Some(tombstone) = self.tombstone_mut(id) {
            prior.restore(&mut tombstone.entry.record.fields, written);
        }
    }

    fn reinsert(&mut self, tombstone: Tombstone) {
        let index = ordering::restore_index(
            &self.mirror,
            tombstone.entry.sort_time(),
            tombstone.index,
        );
        self.mirror.insert(index, tombstone.entry);
    }
}

struct Inner {
    state: Mutex<State>,
    events: broadcast::Sender<SyncEvent>,
}

/// Mirror and optimistic mutations for one collection.
///
/// Cloning is cheap and every clone shares the same mirror. Mutating
/// methods spawn onto the current Tokio runtime.
#[derive(Clone)]
pub struct SyncController {
    repo: CollectionRepository,
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("collection", &self.collection())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl SyncController {
    /// Creates a controller with an empty, unloaded mirror.
    pub fn new(repo: CollectionRepository, config: &SyncConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            repo,
            inner: Arc::new(Inner {
                state: Mutex::new(State::new()),
                events,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    pub fn collection(&self) -> Collection {
        self.repo.collection()
    }

    pub fn repository(&self) -> &CollectionRepository {
        &self.repo
    }

    /// Subscribes to notices for this collection.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    // ── Reads ────────────────────────────────────────────────────

    /// A copy of the mirror, most recent first.
    pub fn snapshot(&self) -> Vec<MirrorEntry> {
        self.lock().mirror.clone()
    }

    /// The records of the mirror, most recent first.
    pub fn records(&self) -> Vec<Record> {
        self.lock()
            .mirror
            .iter()
            .map(|e| e.record.clone())
            .collect()
    }

    /// The live entry for `id`. A temporary id keeps resolving after its
    /// create is confirmed only while mutations addressed to it are queued.
    pub fn get(&self, id: &RecordId) -> Option<MirrorEntry> {
        let state = self.lock();
        let id = state.resolve(id);
        state.position(&id).map(|i| state.mirror[i].clone())
    }

    pub fn len(&self) -> usize {
        self.lock().mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().mirror.is_empty()
    }

    /// Returns true once a load has been applied.
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    /// Returns true while a mutation for `id` is queued or in flight.
    pub fn is_pending(&self, id: &RecordId) -> bool {
        let state = self.lock();
        state.queue.is_busy(id) || state.queue.is_busy(&state.resolve(id))
    }

    /// Number of records with mutations queued or in flight.
    pub fn pending_count(&self) -> usize {
        self.lock().queue.len()
    }

    // ── Load ─────────────────────────────────────────────────────

    /// Fetches the collection and rebuilds the mirror from it.
    ///
    /// Unconfirmed local creates survive the rebuild and entries with a
    /// pending delete stay hidden. A response that arrives after a newer
    /// load was applied is dropped. On failure the mirror is left as it was.
    /// Returns the size of the mirror.
    pub async fn load(&self) -> SyncResult<usize> {
        let (ticket, since) = {
            let mut state = self.lock();
            state.issued_loads += 1;
            state.loads_in_flight += 1;
            (state.issued_loads, state.generation)
        };

        let records = match self.repo.get_all(Some(OrderHint::NewestFirst)).await {
            Ok(records) => records,
            Err(err) => {
                self.lock().finish_load();
                let error = SyncError::from(err);
                warn!("Failed to load {}: {}", self.collection(), error);
                self.emit(SyncEvent::LoadFailed {
                    collection: self.collection(),
                    error: error.clone(),
                });
                return Err(error);
            }
        };

        let count = {
            let mut state = self.lock();
            if ticket < state.applied_load {
                debug!(
                    "Dropping stale {} load #{} (#{} already applied)",
                    self.collection(),
                    ticket,
                    state.applied_load
                );
                state.finish_load();
                return Ok(state.mirror.len());
            }
            let count = state.replace(records, ticket, since);
            state.finish_load();
            count
        };

        info!("Loaded {} {} records", count, self.collection());
        self.emit(SyncEvent::Loaded {
            collection: self.collection(),
            count,
        });
        Ok(count)
    }

    // ── Optimistic mutations ─────────────────────────────────────

    /// Inserts a record under a temporary id and creates it in the
    /// background.
    ///
    /// The payload is validated first; an invalid one fails here and
    /// nothing is inserted.
    pub fn create_optimistic(&self, partial: Fields) -> SyncResult<PendingMutation> {
        self.repo.schema().validate_create(&partial)?;

        let (local, ticket) = {
            let mut state = self.lock();
            state.next_local += 1;
            let local = LocalId::new(state.next_local);
            state.clock = state.clock.tick();
            let at = state.clock;
            state.insert_sorted(MirrorEntry::provisional(
                Record::new(local, partial.clone(), None),
                at,
            ));
            (local, state.queue.enqueue(local.into()))
        };
        debug!("Queued {} create as {}", self.collection(), local);

        let this = self.clone();
        let handle = tokio::spawn(async move { this.finish_create(local, partial, ticket).await });
        Ok(PendingMutation {
            id: local.into(),
            kind: MutationKind::Create,
            handle,
        })
    }

    /// Merges `partial` into a live entry and updates the store in the
    /// background.
    pub fn update_optimistic(&self, id: &RecordId, partial: Fields) -> SyncResult<PendingMutation> {
        self.repo.schema().validate_update(&partial)?;

        let (key, prior, ticket) = {
            let mut state = self.lock();
            let key = state.resolve(id);
            let index = state
                .position(&key)
                .ok_or_else(|| SyncError::UnknownRecord(id.clone()))?;
            let prior = state.mirror[index].record.merge(&partial);
            let ticket = state.queue.enqueue(key.clone());
            (key, prior, ticket)
        };
        debug!("Queued {} update of {}", self.collection(), key);

        let this = self.clone();
        let target = key.clone();
        let handle =
            tokio::spawn(async move { this.finish_update(target, partial, prior, ticket).await });
        Ok(PendingMutation {
            id: key,
            kind: MutationKind::Update,
            handle,
        })
    }

    /// Removes a live entry and deletes it from the store in the background.
    pub fn delete_optimistic(&self, id: &RecordId) -> SyncResult<PendingMutation> {
        let (key, ticket) = {
            let mut state = self.lock();
            let key = state.resolve(id);
            let index = state
                .position(&key)
                .ok_or_else(|| SyncError::UnknownRecord(id.clone()))?;
            let entry = state.mirror.remove(index);
            let ticket = state.queue.enqueue(key.clone());
            state.tombstones.insert(ticket.seq(), Tombstone { entry, index });
            (key, ticket)
        };
        debug!("Queued {} delete of {}", self.collection(), key);

        let this = self.clone();
        let target = key.clone();
        let handle = tokio::spawn(async move { this.finish_delete(target, ticket).await });
        Ok(PendingMutation {
            id: key,
            kind: MutationKind::Delete,
            handle,
        })
    }

    // ── Background halves ────────────────────────────────────────

    async fn finish_create(self, local: LocalId, partial: Fields, ticket: Ticket) -> MutationOutcome {
        let turn = ticket.wait_turn().await;
        let result = self.repo.create(&partial).await;

        let settled = {
            let mut state = self.lock();
            let settled = match result {
                Ok(created) => {
                    let id = state.confirm_create(local, created);
                    state.mark_settled(id.clone());
                    Ok(id)
                }
                Err(err) => {
                    state.discard_create(local);
                    Err(SyncError::from(err))
                }
            };
            state.release(turn.seq());
            settled
        };
        drop(turn);

        match settled {
            Ok(id) => self.settle(MutationKind::Create, id, Ok(())),
            Err(error) => self.settle(MutationKind::Create, local.into(), Err(error)),
        }
    }

    async fn finish_update(
        self,
        target: RecordId,
        partial: Fields,
        prior: PriorValues,
        ticket: Ticket,
    ) -> MutationOutcome {
        let turn = ticket.wait_turn().await;
        let resolved = self.lock().resolve(&target);
        let Some(doc_id) = resolved.as_stored().cloned() else {
            self.lock().release(turn.seq());
            debug!("Dropping {} update of {}: create failed", self.collection(), target);
            return MutationOutcome::Superseded;
        };

        let result = self.repo.update_partial(&doc_id, &partial).await;
        let id = RecordId::Stored(doc_id);
        {
            let mut state = self.lock();
            if result.is_err() {
                state.revert_update(&id, &prior, &partial);
            }
            state.mark_settled(id.clone());
            state.release(turn.seq());
        }
        drop(turn);

        self.settle(MutationKind::Update, id, result.map_err(SyncError::from))
    }

    async fn finish_delete(self, target: RecordId, ticket: Ticket) -> MutationOutcome {
        let turn = ticket.wait_turn().await;
        let resolved = self.lock().resolve(&target);
        let Some(doc_id) = resolved.as_stored().cloned() else {
            let mut state = self.lock();
            state.tombstones.remove(&turn.seq());
            state.release(turn.seq());
            debug!("Dropping {} delete of {}: create failed", self.collection(), target);
            return MutationOutcome::Superseded;
        };

        let result = match self.repo.delete(&doc_id).await {
            Err(RepositoryError::NotFound { .. }) => {
                debug!("{} {} was already gone", self.collection(), doc_id);
                Ok(())
            }
            other => other,
        };
        let id = RecordId::Stored(doc_id);
        {
            let mut state = self.lock();
            let tombstone = state.tombstones.remove(&turn.seq());
            if result.is_err() {
                if let Some(tombstone) = tombstone {
                    state.reinsert(tombstone);
                }
            }
            state.mark_settled(id.clone());
            state.release(turn.seq());
        }
        drop(turn);

        self.settle(MutationKind::Delete, id, result.map_err(SyncError::from))
    }

    fn settle(&self, kind: MutationKind, id: RecordId, result: SyncResult<()>) -> MutationOutcome {
        let collection = self.collection();
        match result {
            Ok(()) => {
                debug!("Confirmed {} {} of {}", collection, kind, id);
                self.emit(SyncEvent::Confirmed {
                    collection,
                    kind,
                    id: id.clone(),
                });
                MutationOutcome::Confirmed(id)
            }
            Err(error) => {
                warn!("Rolled back {} {} of {}: {}", collection, kind, id, error);
                self.emit(SyncEvent::RolledBack {
                    collection,
                    kind,
                    id,
                    error: error.clone(),
                });
                MutationOutcome::RolledBack(error)
            }
        }
    }
}
