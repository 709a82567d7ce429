use hollow_types::{Collection, Error};

#[test]
fn parse_known_collections() {
    assert_eq!(Collection::parse("blogs").unwrap(), Collection::Blogs);
    assert_eq!(Collection::parse("offerings").unwrap(), Collection::Offerings);
    assert_eq!(Collection::parse("messages").unwrap(), Collection::Messages);
}

#[test]
fn parse_rejects_unknown_name() {
    assert_eq!(
        Collection::parse("users"),
        Err(Error::InvalidCollection("users".into()))
    );
}

#[test]
fn parse_is_case_sensitive() {
    assert!(Collection::parse("Blogs").is_err());
}

#[test]
fn display_matches_store_name() {
    for c in Collection::ALL {
        assert_eq!(c.to_string(), c.as_str());
        assert_eq!(c.as_str().parse::<Collection>().unwrap(), c);
    }
}

#[test]
fn item_nouns() {
    assert_eq!(Collection::Blogs.item_noun(), "blog");
    assert_eq!(Collection::Offerings.item_noun(), "offering");
    assert_eq!(Collection::Messages.item_noun(), "message");
}

#[test]
fn serde_uses_store_name() {
    let json = serde_json::to_string(&Collection::Offerings).unwrap();
    assert_eq!(json, "\"offerings\"");
}
