
use qasid_core::KeyValueStore;
use qasid_storage::{key_value, SqliteKeyValueStore};
use test_helpers::TestDb;

#[tokio::test]
async fn test_get_missing_key() {
    let db = TestDb::new().await;

    let value = key_value::get(db.pool(), "playback.progress").await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_set_then_overwrite() {
    let db = TestDb::new().await;

    key_value::set(db.pool(), "playback.progress", r#"{"a":1}"#)
        .await
        .unwrap();
    key_value::set(db.pool(), "playback.progress", r#"{"a":2}"#)
        .await
        .unwrap();

    let value = key_value::get(db.pool(), "playback.progress").await.unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"a":2}"#));
    assert_eq!(
        key_value::keys(db.pool()).await.unwrap(),
        vec!["playback.progress".to_string()]
    );
}

#[tokio::test]
async fn test_remove_reports_whether_row_existed() {
    let db = TestDb::new().await;

    key_value::set(db.pool(), "k", "v").await.unwrap();
    assert!(key_value::remove(db.pool(), "k").await.unwrap());
    assert!(!key_value::remove(db.pool(), "k").await.unwrap());
    assert_eq!(key_value::get(db.pool(), "k").await.unwrap(), None);
}

#[tokio::test]
async fn test_store_trait_roundtrip() {
    let db = TestDb::new().await;
    let store = SqliteKeyValueStore::new(db.pool().clone());

    store.set("ui.locale", "ar").await.unwrap();
    assert_eq!(store.get("ui.locale").await.unwrap().as_deref(), Some("ar"));

    store.remove("ui.locale").await.unwrap();
    store.remove("ui.locale").await.unwrap();
    assert_eq!(store.get("ui.locale").await.unwrap(), None);
}

#[tokio::test]
async fn test_values_survive_reopening_the_database() {
    let db = TestDb::new().await;
    key_value::set(db.pool(), "playback.progress", "{}")
        .await
        .unwrap();
    db.pool().close().await;

    let reopened = qasid_storage::create_pool(&db.url).await.unwrap();
    qasid_storage::run_migrations(&reopened).await.unwrap();

    let value = key_value::get(&reopened, "playback.progress").await.unwrap();
    assert_eq!(value.as_deref(), Some("{}"));
}
