use hollow_model::Fields;
use hollow_storage::{DocumentStore, Fault, MemoryStore, StoreError, StoreOp};
use hollow_types::{Collection, DocumentId, Timestamp};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().expect("object")
}

#[tokio::test]
async fn create_assigns_increasing_timestamps() {
    let store = MemoryStore::new();
    let a = store.create(Collection::Messages, fields(json!({"message": "a"}))).await.unwrap();
    let b = store.create(Collection::Messages, fields(json!({"message": "b"}))).await.unwrap();
    assert!(b.created_at.unwrap() > a.created_at.unwrap());
}

#[tokio::test]
async fn collections_are_isolated() {
    let store = MemoryStore::new();
    let doc = store.create(Collection::Messages, fields(json!({"message": "a"}))).await.unwrap();
    assert!(store.get(Collection::Offerings, &doc.id).await.unwrap().is_none());
    assert!(store.get(Collection::Messages, &doc.id).await.unwrap().is_some());
}

#[tokio::test]
async fn merge_update_absent_returns_false() {
    let store = MemoryStore::new();
    let found = store
        .merge_update(Collection::Blogs, &DocumentId::generate(), fields(json!({"title": "x"})))
        .await
        .unwrap();
    assert!(!found);
    assert!(store.journal().is_empty());
}

#[tokio::test]
async fn scripted_failure_applies_once() {
    let store = MemoryStore::new();
    store.fail_next(StoreOp::List);
    assert!(matches!(
        store.list(Collection::Blogs, None).await,
        Err(StoreError::Unavailable(_))
    ));
    assert!(store.list(Collection::Blogs, None).await.is_ok());
    assert_eq!(store.calls(StoreOp::List), 2);
}

#[tokio::test(start_paused = true)]
async fn delayed_write_lands_after_faster_one() {
    let store = Arc::new(MemoryStore::new());
    let id = store.insert_raw(Collection::Blogs, fields(json!({"title": "v0"})), None);
    store.delay_next(StoreOp::Update, Duration::from_millis(500));

    let slow = {
        let store = store.clone();
        let id = id.clone();
        tokio::spawn(async move {
            store
                .merge_update(Collection::Blogs, &id, fields(json!({"title": "slow"})))
                .await
        })
    };
    tokio::task::yield_now().await;
    store
        .merge_update(Collection::Blogs, &id, fields(json!({"title": "fast"})))
        .await
        .unwrap();
    slow.await.unwrap().unwrap();

    let journal = store.journal();
    assert_eq!(journal[0].fields["title"], "fast");
    assert_eq!(journal[1].fields["title"], "slow");
}

#[tokio::test(start_paused = true)]
async fn delay_then_fail() {
    let store = MemoryStore::new();
    store.push_fault(StoreOp::Delete, Fault::DelayThenFail(Duration::from_millis(10)));
    let res = store.delete(Collection::Blogs, &DocumentId::generate()).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn insert_raw_skips_counters() {
    let store = MemoryStore::new();
    store.insert_raw(Collection::Offerings, fields(json!({"offering": "x"})), Some(Timestamp::from_millis(1)));
    assert_eq!(store.total_calls(), 0);
    assert_eq!(store.documents(Collection::Offerings).len(), 1);
}
