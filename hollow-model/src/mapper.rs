//! Translation between external field names and persisted field names.
//!
//! Every read and write of the document store goes through a [`FieldMapper`];
//! no other component renames fields.
//!
//! A mapper is a permutation of field names. For blog posts `text` is stored
//! as `content`, and a stray external `content` field is stored as `text`, so
//! `to_external(to_persisted(x)) == x` holds for every record, passthrough
//! fields included. Offerings and messages use the identity mapping.

use hollow_types::Collection;

use crate::error::ModelResult;
use crate::record::Fields;

/// (external name, persisted name) pairs.
type Renames = &'static [(&'static str, &'static str)];

const BLOG_RENAMES: Renames = &[("text", "content")];
const IDENTITY: Renames = &[];

/// Bidirectional field-name translation for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapper {
    collection: Collection,
    renames: Renames,
}

impl FieldMapper {
    /// The mapper for a collection.
    pub const fn new(collection: Collection) -> Self {
        let renames = match collection {
            Collection::Blogs => BLOG_RENAMES,
            Collection::Offerings | Collection::Messages => IDENTITY,
        };
        Self {
            collection,
            renames,
        }
    }

    /// The mapper for a collection given by name.
    pub fn for_name(name: &str) -> ModelResult<Self> {
        Ok(Self::new(Collection::parse(name)?))
    }

    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Returns true if the mapping renames nothing.
    pub const fn is_identity(&self) -> bool {
        self.renames.is_empty()
    }

    /// The persisted name of an external field.
    pub fn persisted_name<'a>(&self, external: &'a str) -> &'a str {
        for &(ext, stored) in self.renames {
            if ext == external {
                return stored;
            }
            if stored == external {
                return ext;
            }
        }
        external
    }

    /// The external name of a persisted field.
    pub fn external_name<'a>(&self, persisted: &'a str) -> &'a str {
        // A swap is its own inverse.
        self.persisted_name(persisted)
    }

    /// Translates an external record into persisted field names.
    pub fn to_persisted(&self, external: &Fields) -> Fields {
        external
            .iter()
            .map(|(name, value)| (self.persisted_name(name).to_string(), value.clone()))
            .collect()
    }

    /// Translates a persisted record into external field names.
    pub fn to_external(&self, persisted: &Fields) -> Fields {
        persisted
            .iter()
            .map(|(name, value)| (self.external_name(name).to_string(), value.clone()))
            .collect()
    }
}

/// Translates an external record for the named collection.
pub fn to_persisted(collection: &str, external: &Fields) -> ModelResult<Fields> {
    Ok(FieldMapper::for_name(collection)?.to_persisted(external))
}

/// Translates a persisted record of the named collection.
pub fn to_external(collection: &str, persisted: &Fields) -> ModelResult<Fields> {
    Ok(FieldMapper::for_name(collection)?.to_external(persisted))
}
