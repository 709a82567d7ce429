//! Typed read views over [`Record`]s.
//!
//! Views are lenient: they are built from whatever the store returned, so a
//! missing text field reads as empty and a blank URL reads as absent.

use hollow_types::{RecordId, Timestamp};

use crate::record::Record;

/// A blog post as rendered on the site and the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: RecordId,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub link: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl BlogPost {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.get_str("title").unwrap_or_default().to_string(),
            text: record.get_str("text").unwrap_or_default().to_string(),
            image: record.get_non_blank("image").map(str::to_string),
            link: record.get_non_blank("link").map(str::to_string),
            created_at: record.created_at,
        }
    }
}

/// An offering left by a visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Offering {
    pub id: RecordId,
    pub offering: String,
    pub created_at: Option<Timestamp>,
}

impl Offering {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            offering: record.get_str("offering").unwrap_or_default().to_string(),
            created_at: record.created_at,
        }
    }
}

/// A message on the public message wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: RecordId,
    pub message: String,
    pub created_at: Option<Timestamp>,
}

impl Message {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            message: record.get_str("message").unwrap_or_default().to_string(),
            created_at: record.created_at,
        }
    }
}
