//! Per-record ordering of background mutations.
//!
//! Each record id maps to the completion future of the last mutation queued
//! for it. A new mutation takes that future as its predecessor and becomes
//! the new tail, so mutations for one id reach the store one at a time and in
//! request order. Mutations for different ids never wait on each other.

use futures::future::{BoxFuture, FutureExt, Shared};
use hollow_types::RecordId;
use std::collections::HashMap;
use tokio::sync::oneshot;

/// Resolves when a queued mutation has finished, whatever its outcome.
type Turn = Shared<BoxFuture<'static, ()>>;

/// A place in a record's queue.
///
/// Dropping the ticket, or the [`Finish`] guard it turns into, releases the next
/// mutation in line.
pub(crate) struct Ticket {
    seq: u64,
    previous: Option<Turn>,
    done: oneshot::Sender<()>,
}

impl Ticket {
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// Waits for every earlier mutation on the same record to finish, and
    /// returns the guard that releases the next one when dropped.
    pub(crate) async fn wait_turn(self) -> Finish {
        if let Some(previous) = self.previous {
            previous.await;
        }
        Finish {
            seq: self.seq,
            _done: self.done,
        }
    }
}

/// Held while a mutation talks to the store.
pub(crate) struct Finish {
    seq: u64,
    _done: oneshot::Sender<()>,
}

impl Finish {
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Default)]
pub(crate) struct MutationQueue {
    tails: HashMap<RecordId, (u64, Turn)>,
    next_seq: u64,
}

impl MutationQueue {
    /// Queues a mutation for `id` behind any already queued for it.
    pub(crate) fn enqueue(&mut self, id: RecordId) -> Ticket {
        let (done, finished) = oneshot::channel::<()>();
        let turn: Turn = finished.map(|_| ()).boxed().shared();

        self.next_seq += 1;
        let seq = self.next_seq;
        let previous = self.tails.insert(id, (seq, turn)).map(|(_, turn)| turn);

        Ticket {
            seq,
            previous,
            done,
        }
    }

    /// Makes later mutations addressed to `to` queue behind the current tail
    /// of `from`. Used when a temporary id is confirmed.
    pub(crate) fn alias(&mut self, from: &RecordId, to: RecordId) {
        if let Some(tail) = self.tails.get(from).cloned() {
            self.tails.entry(to).or_insert(tail);
        }
    }

    /// Forgets the tail left by mutation `seq`, if nothing queued after it.
    pub(crate) fn release(&mut self, seq: u64) {
        self.tails.retain(|_, (tail_seq, _)| *tail_seq != seq);
    }

    /// Returns true if a mutation for `id` is queued or in flight.
    pub(crate) fn is_busy(&self, id: &RecordId) -> bool {
        self.tails.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.tails.len()
    }
}
