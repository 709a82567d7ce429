use hollow_model::{BlogPost, Message, Offering, Record};
use hollow_types::{DocumentId, LocalId, RecordId, Timestamp};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn fields(value: Value) -> hollow_model::Fields {
    value.as_object().cloned().expect("object")
}

fn doc(id: &str) -> DocumentId {
    DocumentId::parse(id).unwrap()
}

// ── Accessors ────────────────────────────────────────────────────

#[test]
fn get_str_returns_string_field() {
    let r = Record::new(doc("a"), fields(json!({"title": "Hi", "n": 3})), None);
    assert_eq!(r.get_str("title"), Some("Hi"));
    assert_eq!(r.get_str("n"), None);
    assert_eq!(r.get_str("missing"), None);
}

#[test]
fn get_non_blank_skips_empty_strings() {
    let r = Record::new(doc("a"), fields(json!({"image": "", "link": "x"})), None);
    assert_eq!(r.get_non_blank("image"), None);
    assert_eq!(r.get_non_blank("link"), Some("x"));
}

// ── Merge ────────────────────────────────────────────────────────

#[test]
fn merge_leaves_unset_fields_untouched() {
    let mut r = Record::new(doc("a"), fields(json!({"title": "old", "text": "body"})), None);
    r.merge(&fields(json!({"title": "new"})));
    assert_eq!(r.fields, fields(json!({"title": "new", "text": "body"})));
}

#[test]
fn merge_then_restore_undoes_changes() {
    let original = fields(json!({"title": "old", "text": "body"}));
    let mut r = Record::new(doc("a"), original.clone(), None);
    let written = fields(json!({"title": "new", "image": "pic"}));
    let prior = r.merge(&written);
    let mut touched: Vec<_> = prior.field_names().collect();
    touched.sort_unstable();
    assert_eq!(touched, vec!["image", "title"]);

    prior.restore(&mut r.fields, &written);
    assert_eq!(r.fields, original);
}

#[test]
fn restore_keeps_later_writes() {
    let mut r = Record::new(doc("a"), fields(json!({"title": "v0"})), None);
    let first = fields(json!({"title": "v1"}));
    let prior = r.merge(&first);
    r.merge(&fields(json!({"title": "v2"})));

    prior.restore(&mut r.fields, &first);
    assert_eq!(r.get_str("title"), Some("v2"));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn record_serializes_flat_with_timestamp() {
    let r = Record::new(
        doc("abc"),
        fields(json!({"message": "hello"})),
        Some(Timestamp::from_millis(1_700_000_000_000)),
    );
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "abc",
            "message": "hello",
            "timestamp": "2023-11-14T22:13:20Z",
        })
    );
}

#[test]
fn record_without_timestamp_serializes_null() {
    let r = Record::new(LocalId::new(1), fields(json!({"offering": "stone"})), None);
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(value["id"], "local-1");
    assert_eq!(value["timestamp"], Value::Null);
}

#[test]
fn record_deserializes_from_wire_shape() {
    let r: Record = serde_json::from_value(json!({
        "id": "p1",
        "title": "T",
        "text": "body",
        "timestamp": "2023-11-14T22:13:20Z",
    }))
    .unwrap();
    assert_eq!(r.id, RecordId::Stored(doc("p1")));
    assert_eq!(r.fields, fields(json!({"title": "T", "text": "body"})));
    assert_eq!(r.created_at, Some(Timestamp::from_millis(1_700_000_000_000)));
}

#[test]
fn record_deserializes_without_timestamp() {
    let r: Record = serde_json::from_value(json!({"id": "p1", "message": "m"})).unwrap();
    assert_eq!(r.created_at, None);
}

// ── Views ────────────────────────────────────────────────────────

#[test]
fn blog_view_treats_blank_urls_as_absent() {
    let r = Record::new(
        doc("b"),
        fields(json!({"title": "T", "text": "body", "image": "", "link": "https://x"})),
        Some(Timestamp::from_millis(5)),
    );
    let post = BlogPost::from_record(&r);
    assert_eq!(post.title, "T");
    assert_eq!(post.text, "body");
    assert_eq!(post.image, None);
    assert_eq!(post.link.as_deref(), Some("https://x"));
    assert_eq!(post.created_at, Some(Timestamp::from_millis(5)));
}

#[test]
fn views_tolerate_missing_fields() {
    let r = Record::new(doc("x"), fields(json!({})), None);
    assert_eq!(BlogPost::from_record(&r).title, "");
    assert_eq!(Offering::from_record(&r).offering, "");
    assert_eq!(Message::from_record(&r).message, "");
}
