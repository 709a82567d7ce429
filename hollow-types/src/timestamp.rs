//! Hybrid logical timestamps for record creation times.
//!
//! Store-assigned creation times and provisional local times share one type
//! so the ordering policy can compare them directly. The logical counter
//! breaks ties between events in the same millisecond, and a local clock that
//! observes store times stays ahead of everything it has seen.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Milliseconds since the Unix epoch plus a same-millisecond counter.
///
/// Field order matters: the derived ordering compares `wall_time` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    wall_time: u64,
    logical: u32,
}

fn wall_clock_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self::from_millis(wall_clock_millis())
    }

    #[must_use]
    pub const fn new(wall_time: u64, logical: u32) -> Self {
        Self { wall_time, logical }
    }

    /// Creates a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(wall_time: u64) -> Self {
        Self::new(wall_time, 0)
    }

    #[must_use]
    pub const fn wall_time(&self) -> u64 {
        self.wall_time
    }

    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// Next provisional time after this one.
    #[must_use]
    pub fn tick(&self) -> Self {
        self.observe(self)
    }

    /// Moves the local clock past a time reported by the store.
    ///
    /// Whichever of the two is newer wins; if the wall clock has not caught
    /// up with it, the counter is bumped instead.
    #[must_use]
    pub fn observe(&self, other: &Self) -> Self {
        let newest = (*self).max(*other);
        let now = wall_clock_millis();
        if now > newest.wall_time {
            Self::from_millis(now)
        } else {
            Self::new(newest.wall_time, newest.logical.saturating_add(1))
        }
    }

    /// Converts to a wall-clock instant. The logical counter is dropped.
    pub fn to_datetime(&self) -> crate::Result<DateTime<Utc>> {
        let millis = i64::try_from(self.wall_time)
            .map_err(|_| Error::InvalidTimestamp(self.wall_time.to_string()))?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| Error::InvalidTimestamp(self.wall_time.to_string()))
    }

    /// Creates a timestamp from a wall-clock instant.
    pub fn from_datetime(instant: DateTime<Utc>) -> crate::Result<Self> {
        let millis = u64::try_from(instant.timestamp_millis())
            .map_err(|_| Error::InvalidTimestamp(instant.to_rfc3339()))?;
        Ok(Self::from_millis(millis))
    }
}
