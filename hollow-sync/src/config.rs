use serde::{Deserialize, Serialize};

/// Default cap on messages returned by the combined fetch.
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;

/// Configuration for the sync layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum messages in a combined fetch.
    pub message_limit: usize,
    /// Buffered notices per subscriber before the slowest one lags.
    pub event_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            message_limit: DEFAULT_MESSAGE_LIMIT,
            event_capacity: 64,
        }
    }
}
