// tests/integration/file_store_test.rs

//! Integration tests for the directory-backed cache store.

use super::test_helpers::{MockFetcher, SEO_RESPONSE, T0, init_tracing};
use serde_json::json;
use std::sync::Arc;
use styla_seo::StylaState;
use styla_seo::config::Config;
use styla_seo::core::cache::{CacheEntry, CacheStore, FileCacheStore, ManualClock};
use tempfile::TempDir;

fn new_store() -> (TempDir, FileCacheStore) {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = FileCacheStore::new(dir.path().join("cache"));
    (dir, store)
}

#[tokio::test]
async fn test_missing_entry_and_missing_dir_read_as_none() {
    let (_dir, store) = new_store();
    assert_eq!(store.get("absent").await.unwrap(), None);
}

#[tokio::test]
async fn test_put_creates_dir_and_get_returns_entry() {
    let (_dir, store) = new_store();
    let entry = CacheEntry::new(T0, json!({"page_title": "Spring"}));

    store.put("stylaseo_a_1_0_0", entry.clone()).await.unwrap();

    assert!(store.entry_path("stylaseo_a_1_0_0").exists());
    assert_eq!(store.get("stylaseo_a_1_0_0").await.unwrap(), Some(entry));
}

#[tokio::test]
async fn test_put_overwrites_and_leaves_no_temp_files() {
    let (_dir, store) = new_store();
    store.put("k", CacheEntry::new(T0, json!(1))).await.unwrap();
    store.put("k", CacheEntry::new(T0 + 5, json!(2))).await.unwrap();

    assert_eq!(
        store.get("k").await.unwrap(),
        Some(CacheEntry::new(T0 + 5, json!(2)))
    );
    let files: Vec<_> = std::fs::read_dir(store.dir()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_long_keys_are_hashed_into_short_file_names() {
    let (_dir, store) = new_store();
    let key = "x".repeat(500);
    let path = store.entry_path(&key);
    let file_name = path.file_name().unwrap().to_str().unwrap();

    assert!(file_name.starts_with("h-"));
    assert!(file_name.len() < 100);

    store.put(&key, CacheEntry::new(T0, json!("long"))).await.unwrap();
    assert_eq!(
        store.get(&key).await.unwrap(),
        Some(CacheEntry::new(T0, json!("long")))
    );
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let (_dir, store) = new_store();
    store.put("k", CacheEntry::new(T0, json!(1))).await.unwrap();
    store.remove("k").await.unwrap();
    store.remove("k").await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_file_is_a_read_error() {
    let (_dir, store) = new_store();
    std::fs::create_dir_all(store.dir()).unwrap();
    std::fs::write(store.entry_path("k"), b"{not json").unwrap();
    assert!(store.get("k").await.is_err());
}

#[tokio::test]
async fn test_purge_removes_old_and_corrupt_entries_only() {
    let (_dir, store) = new_store();
    store.put("old", CacheEntry::new(T0 - 100, json!(1))).await.unwrap();
    store.put("new", CacheEntry::new(T0, json!(2))).await.unwrap();
    std::fs::write(store.entry_path("broken"), b"garbage").unwrap();
    std::fs::write(store.dir().join("notes.txt"), b"keep me").unwrap();

    let removed = store.purge_older_than(T0 - 10).await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.get("old").await.unwrap(), None);
    assert!(store.get("new").await.unwrap().is_some());
    assert!(store.dir().join("notes.txt").exists());
}

#[tokio::test]
async fn test_purge_of_missing_dir_removes_nothing() {
    let (_dir, store) = new_store();
    assert_eq!(store.purge_older_than(T0).await.unwrap(), 0);
}

#[tokio::test]
async fn test_service_cache_survives_a_new_state() {
    let (_dir, store) = new_store();
    let store = Arc::new(store);
    let clock = Arc::new(ManualClock::new(T0));

    let first_fetcher = Arc::new(MockFetcher::new(SEO_RESPONSE));
    let first = StylaState::with_parts(
        Config::default(),
        store.clone(),
        clock.clone(),
        first_fetcher.clone(),
    );
    let written = first
        .remote_content
        .get_remote_content("acme", "/magazin/spring")
        .await;

    // A second worker sharing the directory reads the entry without fetching.
    let second_fetcher = Arc::new(MockFetcher::new("{}"));
    let second = StylaState::with_parts(Config::default(), store, clock, second_fetcher.clone());
    let read = second
        .remote_content
        .get_remote_content("acme", "/magazin/spring")
        .await;

    assert_eq!(written, read);
    assert_eq!(first_fetcher.call_count(), 1);
    assert_eq!(second_fetcher.call_count(), 0);
}
