//! Most-recent-first ordering of mirror entries.
//!
//! The key is the creation time. Entries without one sort after every entry
//! that has one and keep their relative order; they are never treated as
//! "now".

use hollow_model::Record;
use hollow_types::Timestamp;
use std::cmp::Ordering;

use crate::mirror::MirrorEntry;

/// Anything that can be placed on a timeline.
pub trait Chronological {
    /// The sort key. `None` sorts last.
    fn sort_time(&self) -> Option<Timestamp>;
}

impl Chronological for Record {
    fn sort_time(&self) -> Option<Timestamp> {
        self.created_at
    }
}

impl Chronological for MirrorEntry {
    fn sort_time(&self) -> Option<Timestamp> {
        self.record.created_at.or(self.provisional_at)
    }
}

impl<T: Chronological> Chronological for &T {
    fn sort_time(&self) -> Option<Timestamp> {
        (**self).sort_time()
    }
}

/// Orders two keys newest first, missing keys last.
pub fn compare_recency(a: Option<Timestamp>, b: Option<Timestamp>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts newest first. Stable.
pub fn sort_descending_by_time<T: Chronological>(mut items: Vec<T>) -> Vec<T> {
    sort_in_place(&mut items);
    items
}

/// In-place form of [`sort_descending_by_time`].
pub fn sort_in_place<T: Chronological>(items: &mut [T]) {
    items.sort_by(|a, b| compare_recency(a.sort_time(), b.sort_time()));
}

/// Returns true if `items` is already in order.
pub fn is_sorted<T: Chronological>(items: &[T]) -> bool {
    items
        .windows(2)
        .all(|pair| compare_recency(pair[0].sort_time(), pair[1].sort_time()) != Ordering::Greater)
}

/// Where a new entry with key `time` goes in sorted `items`: after every
/// entry with an equal or newer key. Same result as append-then-sort.
pub fn insertion_index<T: Chronological>(items: &[T], time: Option<Timestamp>) -> usize {
    items.partition_point(|e| compare_recency(e.sort_time(), time) != Ordering::Greater)
}

/// Where a previously removed entry goes back: its old index, clamped into
/// the run of entries that share its key.
pub fn restore_index<T: Chronological>(items: &[T], time: Option<Timestamp>, prior: usize) -> usize {
    let first = items.partition_point(|e| compare_recency(e.sort_time(), time) == Ordering::Less);
    let last = insertion_index(items, time);
    prior.min(last).max(first)
}
