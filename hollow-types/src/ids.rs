//! Identifier types used throughout the Hollow content layer.
//!
//! Documents are identified by opaque store-assigned strings. Optimistically
//! created records carry a [`LocalId`] until the store confirms them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

const LOCAL_PREFIX: &str = "local-";

/// Store-assigned identifier of a document within a collection.
///
/// Opaque to the client. Stores that mint their own ids use
/// [`DocumentId::generate`], which embeds a timestamp (UUID v7) so ids are
/// never reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a fresh, never-before-issued document id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Wraps an id handed out by a store.
    ///
    /// Empty ids and ids that would read back as a local id are rejected.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() || s.starts_with(LOCAL_PREFIX) {
            return Err(Error::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Temporary identifier of a record created locally and not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(u64);

impl LocalId {
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{LOCAL_PREFIX}{}", self.0)
    }
}

/// Identifier of a record held in a mirror.
///
/// Serialized as a plain string: stored ids as-is, local ids as `local-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RecordId {
    /// Confirmed by the store.
    Stored(DocumentId),
    /// Awaiting confirmation of an optimistic create.
    Local(LocalId),
}

impl RecordId {
    /// Returns the store id, if the record has been confirmed.
    #[must_use]
    pub fn as_stored(&self) -> Option<&DocumentId> {
        match self {
            Self::Stored(id) => Some(id),
            Self::Local(_) => None,
        }
    }

    /// Returns true if the record has not been confirmed by the store yet.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Parses the string form produced by `Display`.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if let Some(rest) = s.strip_prefix(LOCAL_PREFIX) {
            let n = rest
                .parse::<u64>()
                .map_err(|_| Error::InvalidId(s.to_string()))?;
            return Ok(Self::Local(LocalId(n)));
        }
        DocumentId::parse(s).map(Self::Stored)
    }
}

impl From<DocumentId> for RecordId {
    fn from(id: DocumentId) -> Self {
        Self::Stored(id)
    }
}

impl From<LocalId> for RecordId {
    fn from(id: LocalId) -> Self {
        Self::Local(id)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored(id) => id.fmt(f),
            Self::Local(id) => id.fmt(f),
        }
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
