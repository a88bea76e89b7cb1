//! Whole-collection persistence through a key-value store
//!
//! The collection is stored as one JSON array under one key and is always
//! read and written in full.

use std::collections::HashSet;

use chrono::{SubsecRound, Utc};
use kvstore::{KeyValueStore, StoreError};
use tracing::{debug, info, warn};

use super::error::ManagerError;
use crate::domain::{Priority, Task, TaskId, timestamp};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_KEY: &str = "todos";

const SEED_ID: &str = "1";
const SEED_TEXT: &str = "Ödev";
const SEED_CREATED_AT: &str = "2025-05-09T14:02:00";

/// The collection used when nothing usable is stored
pub fn seed_tasks() -> Vec<Task> {
    vec![Task {
        id: TaskId::from(SEED_ID),
        text: SEED_TEXT.to_string(),
        completed: false,
        created_at: timestamp::parse(SEED_CREATED_AT).unwrap_or_else(|| Utc::now().trunc_subsecs(3)),
        due_date: None,
        priority: Some(Priority::Medium),
    }]
}

pub fn encode_tasks(tasks: &[Task]) -> serde_json::Result<String> {
    serde_json::to_string(tasks)
}

pub fn decode_tasks(raw: &str) -> serde_json::Result<Vec<Task>> {
    serde_json::from_str(raw)
}

/// Load the stored collection, falling back to the seed
///
/// Absent, unreadable and malformed values all fall back to [`seed_tasks`].
/// Only an invalid key is reported, since no value could ever be stored
/// under it.
pub fn load_tasks<S: KeyValueStore>(store: &S, key: &str) -> Result<Vec<Task>, StoreError> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!(key, "No stored tasks, using seed collection");
            return Ok(seed_tasks());
        }
        Err(e) if e.is_invalid_key() => return Err(e),
        Err(e) => {
            warn!(key, "Failed to read stored tasks, using seed collection: {}", e);
            return Ok(seed_tasks());
        }
    };

    match decode_tasks(&raw) {
        Ok(tasks) => {
            let tasks = dedup_ids(tasks);
            debug!(key, count = tasks.len(), "Loaded tasks");
            Ok(tasks)
        }
        Err(e) => {
            warn!(key, "Stored tasks are malformed, using seed collection: {}", e);
            Ok(seed_tasks())
        }
    }
}

/// Write the whole collection under `key`
pub fn save_tasks<S: KeyValueStore>(store: &mut S, key: &str, tasks: &[Task]) -> Result<(), ManagerError> {
    let raw = encode_tasks(tasks)?;
    store.set(key, &raw)?;
    debug!(key, count = tasks.len(), "Saved tasks");
    Ok(())
}

/// Keep the first task for each id
fn dedup_ids(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| {
            let fresh = seen.insert(task.id.clone());
            if !fresh {
                warn!(id = %task.id, "Dropping task with duplicate id");
            }
            fresh
        })
        .collect()
}
