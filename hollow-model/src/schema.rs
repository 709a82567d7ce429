use hollow_types::Collection;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::record::Fields;

/// Describes a collection's external fields: which ones are recognized by the
/// field mapper and which ones a new record must carry.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionSchema {
    pub collection: Collection,
    pub fields: &'static [FieldSpec],
}

/// One external field of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// External field name (e.g. "title", "text").
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-blank on create.
    pub required: bool,
}

impl FieldSpec {
    /// Shorthand for a text field.
    pub const fn text(name: &'static str, required: bool) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required,
        }
    }

    /// Shorthand for an optional URL field.
    pub const fn url(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Url,
            required: false,
        }
    }
}

/// The data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Url,
}

const BLOG_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", true),
    FieldSpec::text("text", true),
    FieldSpec::url("image"),
    FieldSpec::url("link"),
];

const OFFERING_FIELDS: &[FieldSpec] = &[FieldSpec::text("offering", true)];

const MESSAGE_FIELDS: &[FieldSpec] = &[FieldSpec::text("message", true)];

static BLOGS: CollectionSchema = CollectionSchema {
    collection: Collection::Blogs,
    fields: BLOG_FIELDS,
};

static OFFERINGS: CollectionSchema = CollectionSchema {
    collection: Collection::Offerings,
    fields: OFFERING_FIELDS,
};

static MESSAGES: CollectionSchema = CollectionSchema {
    collection: Collection::Messages,
    fields: MESSAGE_FIELDS,
};

impl CollectionSchema {
    /// The schema of a collection.
    pub fn of(collection: Collection) -> &'static CollectionSchema {
        match collection {
            Collection::Blogs => &BLOGS,
            Collection::Offerings => &OFFERINGS,
            Collection::Messages => &MESSAGES,
        }
    }

    /// The schema of a collection given by name.
    pub fn for_name(name: &str) -> ModelResult<&'static CollectionSchema> {
        Ok(Self::of(Collection::parse(name)?))
    }

    /// External names of the required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Checks a new record: every required field must be a non-blank string.
    pub fn validate_create(&self, fields: &Fields) -> ModelResult<()> {
        let missing: Vec<&str> = self
            .required_fields()
            .filter(|name| !is_non_blank_text(fields.get(*name)))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::validation(
                self.collection,
                format!("{} required", missing.join(" and ")),
            ))
        }
    }

    /// Checks a partial update: it must touch at least one field, and may not
    /// blank out a required one.
    pub fn validate_update(&self, partial: &Fields) -> ModelResult<()> {
        if partial.is_empty() {
            return Err(ModelError::validation(self.collection, "no fields to update"));
        }
        for name in self.required_fields() {
            if let Some(value) = partial.get(name) {
                if !is_non_blank_text(Some(value)) {
                    return Err(ModelError::validation(
                        self.collection,
                        format!("{name} cannot be empty"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn is_non_blank_text(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}
