//! Integration tests for todostore
//!
//! These cover the end-to-end behavior of the state manager against real
//! storage backends, including the debounced persistence path.

use std::time::Duration;

use tempfile::TempDir;
use todostore::storage::MemoryStorage;
use todostore::{STORAGE_KEY, Task, TaskStore, TodoList};

fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        complete: false,
    }
}

// Short window for tests that wait it out, long one for tests that must
// observe the pre-write state.
const SHORT_WINDOW: Duration = Duration::from_millis(50);
const LONG_WINDOW: Duration = Duration::from_secs(60);

// =============================================================================
// Debounce Tests
// =============================================================================

#[tokio::test]
async fn test_rapid_mutations_coalesce_into_one_write() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), SHORT_WINDOW);

    // Three mutations inside the quiescence window; each still returns its
    // own correct post-mutation list synchronously.
    let after_m1 = list.add(task("a", "first"));
    assert_eq!(after_m1.len(), 1);

    let after_m2 = list.add(task("b", "second"));
    assert_eq!(after_m2.len(), 2);

    let after_m3 = list.delete("a");
    assert_eq!(after_m3.len(), 1);
    assert_eq!(after_m3[0].id, "b");

    // Nothing hits storage until the window elapses
    assert_eq!(storage.write_count(), 0);

    tokio::time::sleep(SHORT_WINDOW * 5).await;

    // Exactly one write, containing the state after the last mutation
    assert_eq!(storage.write_count(), 1);
    let stored: Vec<Task> = serde_json::from_str(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(stored, after_m3);
}

#[tokio::test]
async fn test_flush_forces_pending_write() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), LONG_WINDOW);

    list.add(task("a", "Buy milk"));
    assert_eq!(storage.write_count(), 0);

    list.flush().await.unwrap();
    assert_eq!(storage.write_count(), 1);

    // Flush with nothing pending is a no-op
    list.flush().await.unwrap();
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test]
async fn test_drop_writes_pending_state() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), LONG_WINDOW);

    list.add(task("a", "Buy milk"));
    drop(list);

    // Channel close makes the actor write what was still pending
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(storage.write_count(), 1);
    let stored: Vec<Task> = serde_json::from_str(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[tokio::test]
async fn test_add_to_empty_storage_persists_exact_layout() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), SHORT_WINDOW);

    let returned = list.add(Task {
        id: "a".to_string(),
        title: "Buy milk".to_string(),
        description: String::new(),
        complete: false,
    });
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].id, "a");

    tokio::time::sleep(SHORT_WINDOW * 5).await;

    assert_eq!(
        storage.raw(STORAGE_KEY).unwrap(),
        r#"[{"id":"a","title":"Buy milk","description":"","complete":false}]"#
    );
}

#[tokio::test]
async fn test_reorder_via_set_all() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), SHORT_WINDOW);
    let (a, b, c) = (task("a", "a"), task("b", "b"), task("c", "c"));
    list.set_all(vec![a.clone(), b.clone(), c.clone()]);

    let returned = list.set_all(vec![c.clone(), a.clone(), b.clone()]);
    let ids: Vec<&str> = returned.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    tokio::time::sleep(SHORT_WINDOW * 5).await;
    let stored: Vec<Task> = serde_json::from_str(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(stored, vec![c, a, b]);
}

#[tokio::test]
async fn test_mark_complete_and_absent_id() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage), SHORT_WINDOW);
    list.set_all(vec![task("x", "x")]);

    let after = list.mark_complete("x");
    assert!(after[0].complete);

    // Absent id leaves the list unchanged
    let unchanged = list.mark_complete("y");
    assert_eq!(unchanged, after);
}

#[tokio::test]
async fn test_restart_over_same_storage_sees_persisted_state() {
    let temp = TempDir::new().unwrap();
    let store_path = temp.path().join("store");

    {
        let store = TaskStore::open(&store_path).unwrap();
        let mut list = TodoList::with_quiescence(store, SHORT_WINDOW);
        list.add(task("a", "Buy milk"));
        list.mark_complete("a");
        list.flush().await.unwrap();
    }

    // A fresh manager over the same storage loads what the first persisted
    let store = TaskStore::open(&store_path).unwrap();
    let list = TodoList::with_quiescence(store, SHORT_WINDOW);
    assert!(list.is_ready());
    assert_eq!(list.current().len(), 1);
    assert_eq!(list.current()[0].id, "a");
    assert!(list.current()[0].complete);
}

#[tokio::test]
async fn test_stored_value_converges_to_last_published_state() {
    let storage = MemoryStorage::new();
    let mut list = TodoList::with_quiescence(TaskStore::new(storage.clone()), SHORT_WINDOW);

    list.add(task("a", "a"));
    tokio::time::sleep(SHORT_WINDOW * 5).await;
    assert_eq!(storage.write_count(), 1);

    // A later burst supersedes the earlier stored value
    list.add(task("b", "b"));
    list.delete("b");
    tokio::time::sleep(SHORT_WINDOW * 5).await;

    assert_eq!(storage.write_count(), 2);
    let stored: Vec<Task> = serde_json::from_str(&storage.raw(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "a");
}
