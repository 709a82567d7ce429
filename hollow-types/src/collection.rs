//! The named collections of the document store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A named partition of entities of one type.
///
/// The set is fixed: any other name is rejected with
/// [`Error::InvalidCollection`] before a store is ever touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Blogs,
    Offerings,
    Messages,
}

impl Collection {
    /// Every collection, in dashboard tab order.
    pub const ALL: [Collection; 3] = [Collection::Blogs, Collection::Offerings, Collection::Messages];

    /// The collection's name in the document store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Offerings => "offerings",
            Self::Messages => "messages",
        }
    }

    /// Singular noun for one item of the collection ("blog", "offering", "message").
    #[must_use]
    pub const fn item_noun(&self) -> &'static str {
        match self {
            Self::Blogs => "blog",
            Self::Offerings => "offering",
            Self::Messages => "message",
        }
    }

    /// Parses a collection name, rejecting anything outside the fixed set.
    pub fn parse(name: &str) -> crate::Result<Self> {
        match name {
            "blogs" => Ok(Self::Blogs),
            "offerings" => Ok(Self::Offerings),
            "messages" => Ok(Self::Messages),
            other => Err(Error::InvalidCollection(other.to_string())),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
