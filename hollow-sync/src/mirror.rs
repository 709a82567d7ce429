use hollow_model::Record;
use hollow_types::Timestamp;

/// One row of a collection mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorEntry {
    pub record: Record,
    /// Local clock reading taken when an optimistic create was issued. Only
    /// used for ordering; `record.created_at` stays empty until the store
    /// assigns it.
    pub provisional_at: Option<Timestamp>,
}

impl MirrorEntry {
    /// An entry read back from the store.
    pub fn confirmed(record: Record) -> Self {
        Self {
            record,
            provisional_at: None,
        }
    }

    /// An entry for an optimistic create that the store has not answered.
    pub fn provisional(record: Record, at: Timestamp) -> Self {
        Self {
            record,
            provisional_at: Some(at),
        }
    }

    /// Returns true while the entry still carries a temporary id.
    pub fn is_local(&self) -> bool {
        self.record.id.is_local()
    }
}
