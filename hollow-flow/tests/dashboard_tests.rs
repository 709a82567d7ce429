use hollow_flow::{Dashboard, FlowError, Tab};
use hollow_model::Fields;
use hollow_storage::{MemoryStore, StoreOp};
use hollow_sync::{ContentService, MutationOutcome, SyncConfig, SyncError};
use hollow_types::{Collection, DocumentId, RecordId, Timestamp};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("object")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn setup() -> (Arc<MemoryStore>, Dashboard) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let service = ContentService::new(store.clone(), SyncConfig::default());
    (store, Dashboard::for_service(&service))
}

fn seed(store: &MemoryStore, collection: Collection, body: Value, millis: u64) -> RecordId {
    store
        .insert_raw(collection, fields(body), Some(Timestamp::from_millis(millis)))
        .into()
}

fn headlines(dashboard: &Dashboard, tab: Tab) -> Vec<String> {
    dashboard.rows_for(tab).into_iter().map(|r| r.headline).collect()
}

// ── Tabs and rows ────────────────────────────────────────────────

#[tokio::test]
async fn rows_follow_selected_tab() {
    let (store, mut dashboard) = setup();
    seed(
        &store,
        Collection::Blogs,
        json!({"title": "Hole", "content": "It hums.", "image": ""}),
        1,
    );
    seed(&store, Collection::Messages, json!({"message": "hi"}), 2);
    dashboard.load().await;

    assert_eq!(dashboard.tab(), Tab::Blogs);
    let rows = dashboard.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].headline, "Hole");
    assert_eq!(rows[0].detail.as_deref(), Some("It hums."));
    assert_eq!(rows[0].timestamp, Some(Timestamp::from_millis(1)));
    assert!(!rows[0].pending);

    dashboard.select_tab(Tab::Messages);
    assert_eq!(dashboard.rows()[0].headline, "hi");
    assert_eq!(dashboard.rows()[0].detail, None);

    dashboard.select_tab(Tab::Offerings);
    assert!(dashboard.rows().is_empty());
}

#[tokio::test]
async fn rows_are_newest_first() {
    let (store, dashboard) = setup();
    seed(&store, Collection::Offerings, json!({"offering": "stone"}), 1);
    seed(&store, Collection::Offerings, json!({"offering": "feather"}), 3);
    seed(&store, Collection::Offerings, json!({"offering": "seed"}), 2);
    dashboard.load().await;

    assert_eq!(
        headlines(&dashboard, Tab::Offerings),
        vec!["feather", "seed", "stone"]
    );
}

#[test]
fn delete_prompt_names_one_item() {
    assert_eq!(
        Tab::Blogs.delete_prompt(),
        "Are you sure you want to delete this blog?"
    );
    assert_eq!(
        Tab::Offerings.delete_prompt(),
        "Are you sure you want to delete this offering?"
    );
    assert_eq!(
        Tab::Messages.delete_prompt(),
        "Are you sure you want to delete this message?"
    );
}

// ── load ─────────────────────────────────────────────────────────

#[tokio::test]
async fn load_reports_every_collection() {
    let (store, dashboard) = setup();
    seed(&store, Collection::Messages, json!({"message": "hi"}), 1);

    let report = dashboard.load().await;
    assert!(report.is_complete());
    assert_eq!(
        report.loaded,
        vec![
            (Collection::Blogs, 0),
            (Collection::Offerings, 0),
            (Collection::Messages, 1),
        ]
    );
    assert!(!dashboard.is_loading());
}

#[tokio::test]
async fn one_failing_collection_does_not_stop_the_others() {
    let (store, dashboard) = setup();
    seed(&store, Collection::Messages, json!({"message": "hi"}), 1);
    store.fail_next(StoreOp::List);

    let report = dashboard.load().await;
    assert!(!report.is_complete());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.loaded.len(), 2);
    assert_eq!(store.calls(StoreOp::List), 3);
}

#[tokio::test(start_paused = true)]
async fn is_loading_while_in_flight() {
    let (store, dashboard) = setup();
    store.delay_next(StoreOp::List, Duration::from_millis(50));

    let task = tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.load().await }
    });
    tokio::task::yield_now().await;
    assert!(dashboard.is_loading());

    task.await.unwrap();
    assert!(!dashboard.is_loading());
}

// ── Moderation ───────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_row() {
    let (store, dashboard) = setup();
    let id = seed(&store, Collection::Messages, json!({"message": "spam"}), 1);
    seed(&store, Collection::Messages, json!({"message": "kind"}), 2);
    dashboard.load().await;

    let pending = dashboard.delete(Tab::Messages, &id).unwrap();
    assert_eq!(headlines(&dashboard, Tab::Messages), vec!["kind"]);

    assert!(pending.settled().await.is_confirmed());
    assert_eq!(store.documents(Collection::Messages).len(), 1);
}

#[tokio::test]
async fn failed_delete_restores_row() {
    let (store, dashboard) = setup();
    seed(&store, Collection::Messages, json!({"message": "newer"}), 3);
    let id = seed(&store, Collection::Messages, json!({"message": "target"}), 2);
    seed(&store, Collection::Messages, json!({"message": "older"}), 1);
    dashboard.load().await;

    store.fail_next(StoreOp::Delete);
    let pending = dashboard.delete(Tab::Messages, &id).unwrap();
    assert_eq!(headlines(&dashboard, Tab::Messages), vec!["newer", "older"]);

    assert!(matches!(pending.settled().await, MutationOutcome::RolledBack(_)));
    assert_eq!(
        headlines(&dashboard, Tab::Messages),
        vec!["newer", "target", "older"]
    );
}

#[tokio::test]
async fn delete_of_unknown_row_is_rejected() {
    let (store, dashboard) = setup();
    dashboard.load().await;
    let missing = RecordId::from(DocumentId::generate());

    let err = dashboard.delete(Tab::Blogs, &missing).unwrap_err();
    assert_eq!(err, FlowError::Sync(SyncError::UnknownRecord(missing)));
    assert_eq!(store.calls(StoreOp::Delete), 0);
}

#[tokio::test]
async fn edit_blog_shows_pending_then_confirms() {
    let (store, dashboard) = setup();
    let id = seed(
        &store,
        Collection::Blogs,
        json!({"title": "Draft", "content": "Body"}),
        1,
    );
    dashboard.load().await;

    let pending = dashboard
        .edit_blog(&id, fields(json!({"title": "Final"})))
        .unwrap();
    let row = dashboard.rows_for(Tab::Blogs).remove(0);
    assert_eq!(row.headline, "Final");
    assert!(row.pending);

    assert!(pending.settled().await.is_confirmed());
    assert!(!dashboard.rows_for(Tab::Blogs)[0].pending);

    let doc = store.documents(Collection::Blogs).remove(0);
    assert_eq!(doc.fields, fields(json!({"title": "Final", "content": "Body"})));
}
