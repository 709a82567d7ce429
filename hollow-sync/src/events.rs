//! Notices broadcast by a [`SyncController`](crate::SyncController).

use hollow_types::{Collection, RecordId};

use crate::error::SyncError;

/// Kind of an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Something the view layer may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The mirror was rebuilt from a fetch.
    Loaded { collection: Collection, count: usize },

    /// A fetch failed; the mirror kept its last known-good contents.
    LoadFailed {
        collection: Collection,
        error: SyncError,
    },

    /// The store accepted a mutation. `id` is the record's id after the
    /// mutation, so a confirmed create carries the store id.
    Confirmed {
        collection: Collection,
        kind: MutationKind,
        id: RecordId,
    },

    /// The store rejected a mutation and the mirror was rolled back.
    RolledBack {
        collection: Collection,
        kind: MutationKind,
        id: RecordId,
        error: SyncError,
    },
}

impl SyncEvent {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Loaded { collection, .. }
            | Self::LoadFailed { collection, .. }
            | Self::Confirmed { collection, .. }
            | Self::RolledBack { collection, .. } => *collection,
        }
    }

    /// Returns true for notices that report a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::LoadFailed { .. } | Self::RolledBack { .. })
    }
}
