//! Record model for Hollow.
//!
//! Defines the types every layer above the document store agrees on:
//! - [`Record`]: a document in the external field vocabulary (id, fields, creation time)
//! - [`FieldMapper`]: the single place where external field names are
//!   translated to persisted ones (`text` <-> `content` for blog posts)
//! - [`CollectionSchema`]: recognized and required fields per collection
//! - [`BlogPost`], [`Offering`], [`Message`]: typed read views for rendering
//!
//! Nothing in this crate performs I/O.

mod error;
mod mapper;
mod record;
mod schema;
mod views;

pub use error::{ModelError, ModelResult};
pub use mapper::{to_external, to_persisted, FieldMapper};
pub use record::{Fields, PriorValues, Record};
pub use schema::{CollectionSchema, FieldKind, FieldSpec};
pub use views::{BlogPost, Message, Offering};
