//! Integration tests for the task manager
//!
//! These tests drive TaskManager against a real FileStore on disk.

use std::fs;

use chrono::NaiveDate;
use kvstore::{FileStore, KeyValueStore, MemoryStore};
use proptest::prelude::*;
use taskmanager::manager::{DEFAULT_KEY, decode_tasks, filter_tasks};
use taskmanager::{Filter, IdResolver, Priority, Task, TaskDraft, TaskId, TaskManager};
use tempfile::TempDir;

fn open_manager(temp_dir: &TempDir) -> TaskManager<FileStore> {
    let store = FileStore::open(temp_dir.path()).expect("Failed to open store");
    TaskManager::open(store, DEFAULT_KEY).expect("Failed to open manager")
}

fn stored_tasks(temp_dir: &TempDir) -> Vec<Task> {
    let raw = fs::read_to_string(temp_dir.path().join("todos.json")).expect("Failed to read stored value");
    decode_tasks(&raw).expect("Stored value should be valid JSON")
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_full_lifecycle_against_file_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut manager = open_manager(&temp_dir);

    // First mount seeds and writes the collection back
    assert_eq!(manager.tasks().len(), 1);
    assert_eq!(manager.tasks()[0].text, "Ödev");
    assert_eq!(stored_tasks(&temp_dir).len(), 1);

    // Add
    let due = NaiveDate::from_ymd_opt(2025, 6, 1);
    *manager.draft_mut() = TaskDraft::new("Buy milk")
        .with_due_date(due)
        .with_priority(Priority::High);
    let milk = manager.add_task().expect("add should persist").expect("text is not blank");

    let stored = stored_tasks(&temp_dir);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].text, "Buy milk");
    assert_eq!(stored[1].due_date, due);
    assert_eq!(stored[1].priority, Some(Priority::High));
    assert!(!stored[1].completed);
    assert!(manager.draft().is_blank());

    // Toggle
    assert!(manager.toggle_task(&milk).expect("toggle should persist"));
    assert!(stored_tasks(&temp_dir)[1].completed);
    assert_eq!(filter_tasks(manager.tasks(), Filter::Active).len(), 1);
    assert_eq!(filter_tasks(manager.tasks(), Filter::Completed).len(), 1);

    // Delete the seed
    assert!(manager.delete_task(&TaskId::from("1")).expect("delete should persist"));
    let stored = stored_tasks(&temp_dir);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, milk);

    let stats = manager.stats();
    assert_eq!((stats.total, stats.completed, stats.active), (1, 1, 0));
}

#[test]
fn test_reopen_restores_collection() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let (id, before) = {
        let mut manager = open_manager(&temp_dir);
        *manager.draft_mut() = TaskDraft::new("Water plants")
            .with_due_date(NaiveDate::from_ymd_opt(2025, 7, 15))
            .with_priority(Priority::Low);
        let id = manager.add_task().expect("add").expect("id");
        manager.toggle_task(&id).expect("toggle");
        (id, manager.tasks().to_vec())
    };

    let manager = open_manager(&temp_dir);
    assert_eq!(manager.tasks(), before.as_slice());
    assert!(manager.get(&id).map(|task| task.completed).unwrap_or(false));
}

#[test]
fn test_edit_survives_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let seed = TaskId::from("1");

    {
        let mut manager = open_manager(&temp_dir);
        assert!(manager.begin_edit(&seed));
        let draft = manager.edit_draft_mut().expect("edit in progress");
        draft.text = "Homework".to_string();
        draft.priority = Priority::High;
        assert!(manager.save_edit().expect("save should persist"));
    }

    let manager = open_manager(&temp_dir);
    let task = manager.get(&seed).expect("seed still present");
    assert_eq!(task.text, "Homework");
    assert_eq!(task.priority, Some(Priority::High));
}

#[test]
fn test_corrupt_value_falls_back_to_seed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("todos.json"), "{not json").expect("Failed to write corrupt value");

    let manager = open_manager(&temp_dir);
    assert_eq!(manager.tasks().len(), 1);
    assert_eq!(manager.tasks()[0].id.as_str(), "1");

    // The seed replaces the corrupt value on mount
    assert_eq!(stored_tasks(&temp_dir).len(), 1);
}

#[test]
fn test_stored_empty_array_is_not_reseeded() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("todos.json"), "[]").expect("Failed to write value");

    let manager = open_manager(&temp_dir);
    assert!(manager.tasks().is_empty());
}

#[test]
fn test_separate_keys_are_independent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let store = FileStore::open(temp_dir.path()).expect("Failed to open store");
    let mut work = TaskManager::open(store, "work").expect("Failed to open manager");
    *work.draft_mut() = TaskDraft::new("Write report");
    work.add_task().expect("add").expect("id");

    let home = open_manager(&temp_dir);
    assert_eq!(home.tasks().len(), 1);
    assert_eq!(home.tasks()[0].text, "Ödev");
    assert!(temp_dir.path().join("work.json").exists());
}

#[test]
fn test_invalid_key_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::open(temp_dir.path()).expect("Failed to open store");

    assert!(TaskManager::open(store, "../escape").is_err());
}

#[test]
fn test_resolver_finds_added_task_by_short_id() {
    let mut manager = TaskManager::open(MemoryStore::new(), DEFAULT_KEY).expect("Failed to open manager");
    *manager.draft_mut() = TaskDraft::new("Buy milk");
    let id = manager.add_task().expect("add").expect("id");

    let resolver = IdResolver::new(manager.tasks().iter().map(|task| &task.id));
    assert_eq!(resolver.resolve(id.short()), Ok(Some(id.clone())));
    assert_eq!(resolver.resolve("1"), Ok(Some(TaskId::from("1"))));
    assert_eq!(resolver.resolve("no-such-task"), Ok(None));
}

// =============================================================================
// Properties
// =============================================================================

fn build_manager(specs: &[(String, bool)]) -> TaskManager<MemoryStore> {
    let mut manager = TaskManager::open(MemoryStore::new(), DEFAULT_KEY).expect("Failed to open manager");
    let seed = TaskId::from("1");
    manager.delete_task(&seed).expect("delete seed");

    for (text, completed) in specs {
        *manager.draft_mut() = TaskDraft::new(text.clone());
        let id = manager.add_task().expect("add").expect("id");
        if *completed {
            manager.toggle_task(&id).expect("toggle");
        }
    }
    manager
}

proptest! {
    #[test]
    fn prop_active_and_completed_partition_all(
        specs in prop::collection::vec(("[a-z]{1,12}", any::<bool>()), 0..20)
    ) {
        let manager = build_manager(&specs);
        let all = filter_tasks(manager.tasks(), Filter::All);
        let active = filter_tasks(manager.tasks(), Filter::Active);
        let completed = filter_tasks(manager.tasks(), Filter::Completed);

        prop_assert_eq!(all.len(), specs.len());
        prop_assert_eq!(active.len() + completed.len(), all.len());
        prop_assert!(active.iter().all(|task| !task.completed));
        prop_assert!(completed.iter().all(|task| task.completed));

        // Each filtered view keeps collection order
        let positions: Vec<usize> = active
            .iter()
            .map(|task| manager.tasks().iter().position(|t| t.id == task.id).unwrap_or(usize::MAX))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        let stats = manager.stats();
        prop_assert_eq!(stats.active, active.len());
        prop_assert_eq!(stats.completed, completed.len());
    }

    #[test]
    fn prop_toggle_twice_restores_collection(
        specs in prop::collection::vec(("[a-z]{1,12}", any::<bool>()), 1..10),
        pick in any::<prop::sample::Index>()
    ) {
        let mut manager = build_manager(&specs);
        let before = manager.tasks().to_vec();
        let id = before[pick.index(before.len())].id.clone();

        manager.toggle_task(&id).expect("toggle");
        manager.toggle_task(&id).expect("toggle");

        prop_assert_eq!(manager.tasks(), before.as_slice());
        let stored = decode_tasks(&manager.store().get(DEFAULT_KEY).expect("get").expect("value")).expect("decode");
        prop_assert_eq!(stored, before);
    }
}
