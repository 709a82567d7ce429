use hollow_model::{CollectionSchema, FieldKind, FieldSpec, ModelError};
use hollow_types::Collection;
use serde_json::{json, Value};

fn fields(value: Value) -> hollow_model::Fields {
    value.as_object().cloned().expect("object")
}

// ── FieldSpec constructors ───────────────────────────────────────

#[test]
fn text_field_spec() {
    let f = FieldSpec::text("title", true);
    assert_eq!(f.name, "title");
    assert_eq!(f.kind, FieldKind::Text);
    assert!(f.required);
}

#[test]
fn url_field_is_optional() {
    let f = FieldSpec::url("image");
    assert_eq!(f.kind, FieldKind::Url);
    assert!(!f.required);
}

// ── Lookup ───────────────────────────────────────────────────────

#[test]
fn schema_of_each_collection() {
    for c in Collection::ALL {
        assert_eq!(CollectionSchema::of(c).collection, c);
    }
}

#[test]
fn for_name_rejects_unknown() {
    assert!(matches!(
        CollectionSchema::for_name("drafts"),
        Err(ModelError::InvalidCollection(name)) if name == "drafts"
    ));
}

#[test]
fn blog_fields_and_required_fields() {
    let schema = CollectionSchema::of(Collection::Blogs);
    let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["title", "text", "image", "link"]);
    let required: Vec<_> = schema.required_fields().collect();
    assert_eq!(required, vec!["title", "text"]);
}

#[test]
fn message_and_offering_require_body() {
    let req: Vec<_> = CollectionSchema::of(Collection::Messages).required_fields().collect();
    assert_eq!(req, vec!["message"]);
    let req: Vec<_> = CollectionSchema::of(Collection::Offerings).required_fields().collect();
    assert_eq!(req, vec!["offering"]);
}

// ── validate_create ──────────────────────────────────────────────

#[test]
fn blog_create_with_title_and_text_is_valid() {
    let schema = CollectionSchema::of(Collection::Blogs);
    assert!(schema.validate_create(&fields(json!({"title": "a", "text": "b"}))).is_ok());
}

#[test]
fn blog_create_missing_text_is_rejected() {
    let schema = CollectionSchema::of(Collection::Blogs);
    let err = schema.validate_create(&fields(json!({"title": "a"}))).unwrap_err();
    assert_eq!(
        err,
        ModelError::Validation {
            collection: Collection::Blogs,
            reason: "text required".into(),
        }
    );
}

#[test]
fn blog_create_missing_both_names_both() {
    let schema = CollectionSchema::of(Collection::Blogs);
    let err = schema.validate_create(&fields(json!({}))).unwrap_err();
    assert!(err.to_string().contains("title and text required"));
}

#[test]
fn whitespace_only_body_is_rejected() {
    let schema = CollectionSchema::of(Collection::Messages);
    assert!(schema.validate_create(&fields(json!({"message": "   \n\t"}))).is_err());
}

#[test]
fn non_string_body_is_rejected() {
    let schema = CollectionSchema::of(Collection::Offerings);
    assert!(schema.validate_create(&fields(json!({"offering": 42}))).is_err());
}

#[test]
fn padded_body_is_accepted() {
    let schema = CollectionSchema::of(Collection::Offerings);
    assert!(schema.validate_create(&fields(json!({"offering": "  stone "}))).is_ok());
}

// ── validate_update ──────────────────────────────────────────────

#[test]
fn empty_update_is_rejected() {
    let schema = CollectionSchema::of(Collection::Blogs);
    let err = schema.validate_update(&fields(json!({}))).unwrap_err();
    assert!(err.to_string().contains("no fields to update"));
}

#[test]
fn update_cannot_blank_required_field() {
    let schema = CollectionSchema::of(Collection::Blogs);
    assert!(schema.validate_update(&fields(json!({"title": " "}))).is_err());
}

#[test]
fn update_of_optional_field_may_clear_it() {
    let schema = CollectionSchema::of(Collection::Blogs);
    assert!(schema.validate_update(&fields(json!({"image": ""}))).is_ok());
}

#[test]
fn schema_serializes_field_kinds() {
    let json = serde_json::to_value(CollectionSchema::of(Collection::Blogs)).unwrap();
    assert_eq!(json["collection"], "blogs");
    assert_eq!(json["fields"][2]["kind"], "url");
}
