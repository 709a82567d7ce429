use hollow_types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record's payload: field name to JSON value.
pub type Fields = serde_json::Map<String, Value>;

/// A document of one collection, in the external field vocabulary.
///
/// On the wire the fields are flattened next to `id`, and the creation time
/// is exposed as `timestamp` (an RFC 3339 instant, or `null` while the store
/// has not assigned one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Fields,
    #[serde(rename = "timestamp", default, with = "wall_clock")]
    pub created_at: Option<Timestamp>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: Fields, created_at: Option<Timestamp>) -> Self {
        Self {
            id: id.into(),
            fields,
            created_at,
        }
    }

    /// Extract a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Extract a string field, treating blank strings as absent.
    pub fn get_non_blank(&self, field: &str) -> Option<&str> {
        self.get_str(field).filter(|s| !s.trim().is_empty())
    }

    /// Merges `partial` into the fields and returns what it overwrote.
    ///
    /// Fields absent from `partial` are left untouched.
    pub fn merge(&mut self, partial: &Fields) -> PriorValues {
        let mut prior = Vec::with_capacity(partial.len());
        for (name, value) in partial {
            let old = self.fields.insert(name.clone(), value.clone());
            prior.push((name.clone(), old));
        }
        PriorValues(prior)
    }
}

/// Field values captured before a merge, used to undo it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriorValues(Vec<(String, Option<Value>)>);

impl PriorValues {
    /// Names of the fields the merge touched.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Undoes a merge of `written` into `fields`.
    ///
    /// A field is only restored while it still holds the value the merge
    /// wrote; a later write to the same field wins.
    pub fn restore(&self, fields: &mut Fields, written: &Fields) {
        for (name, old) in &self.0 {
            if fields.get(name) != written.get(name) {
                continue;
            }
            match old {
                Some(value) => {
                    fields.insert(name.clone(), value.clone());
                }
                None => {
                    fields.remove(name);
                }
            }
        }
    }
}

mod wall_clock {
    use chrono::{DateTime, Utc};
    use hollow_types::Timestamp;
    use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error> {
        let instant = ts
            .map(|t| t.to_datetime())
            .transpose()
            .map_err(ser::Error::custom)?;
        instant.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Timestamp>, D::Error> {
        let instant = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        instant
            .map(Timestamp::from_datetime)
            .transpose()
            .map_err(de::Error::custom)
    }
}
