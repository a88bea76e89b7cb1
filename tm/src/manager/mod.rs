//! Task manager: in-memory task state synchronized with a key-value store
//!
//! `TaskManager` owns the task collection plus the interactive state around
//! it (new-task draft, active filter, edit session, filter menu). Every
//! operation that changes the collection writes the whole collection back to
//! the store before returning. Operations on unknown ids and blank input are
//! silent no-ops and never touch the store.

mod draft;
mod error;
mod persistence;

pub use draft::{EditSession, TaskDraft};
pub use error::ManagerError;
pub use persistence::{DEFAULT_KEY, decode_tasks, encode_tasks, load_tasks, save_tasks, seed_tasks};

use kvstore::KeyValueStore;
use tracing::{debug, info, warn};

use crate::domain::{Filter, Task, TaskId};

/// Result alias for task manager operations
pub type Result<T> = std::result::Result<T, ManagerError>;

/// Task counts shown in the summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

/// Ordered subsequence of `tasks` passing `filter`
pub fn filter_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        completed,
        active: total - completed,
    }
}

/// The task manager component
pub struct TaskManager<S: KeyValueStore> {
    store: S,
    key: String,
    tasks: Vec<Task>,
    draft: TaskDraft,
    filter: Filter,
    editing: Option<EditSession>,
    filter_menu_open: bool,
}

impl<S: KeyValueStore> TaskManager<S> {
    /// Load the collection stored under `key` (or the seed) and write it back
    ///
    /// A failed initial write is logged, not returned: the component still
    /// mounts with the loaded collection.
    pub fn open(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        kvstore::validate_key(&key)?;

        let tasks = load_tasks(&store, &key)?;
        let mut manager = Self {
            store,
            key,
            tasks,
            draft: TaskDraft::default(),
            filter: Filter::default(),
            editing: None,
            filter_menu_open: false,
        };

        if let Err(e) = manager.persist() {
            warn!("Failed to write initial task collection: {}", e);
        }

        info!(key = %manager.key, count = manager.tasks.len(), "Task manager ready");
        Ok(manager)
    }

    // === Collection ===

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // === New task ===

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    /// Append a task built from the new-task draft and clear the draft
    ///
    /// Returns the new id, or `None` if the draft text is blank.
    pub fn add_task(&mut self) -> Result<Option<TaskId>> {
        if self.draft.is_blank() {
            debug!("Ignoring blank task");
            return Ok(None);
        }

        let draft = std::mem::take(&mut self.draft);
        let mut task = Task::new(draft.text, draft.due_date, draft.priority);
        while self.get(&task.id).is_some() {
            task.id = TaskId::generate();
        }

        let id = task.id.clone();
        debug!(id = %id, priority = %draft.priority, "Adding task");
        self.tasks.push(task);
        self.persist()?;
        Ok(Some(id))
    }

    // === Per-task actions ===

    /// Flip the completion flag; returns false for unknown ids
    pub fn toggle_task(&mut self, id: &TaskId) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) else {
            debug!(id = %id, "Toggle ignored, no such task");
            return Ok(false);
        };

        task.completed = !task.completed;
        debug!(id = %id, completed = task.completed, "Toggled task");
        self.persist()?;
        Ok(true)
    }

    /// Remove a task; returns false for unknown ids
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        let Some(index) = self.tasks.iter().position(|task| &task.id == id) else {
            debug!(id = %id, "Delete ignored, no such task");
            return Ok(false);
        };

        self.tasks.remove(index);
        if self.editing.as_ref().is_some_and(|session| &session.id == id) {
            self.editing = None;
        }
        debug!(id = %id, "Deleted task");
        self.persist()?;
        Ok(true)
    }

    // === Editing ===

    /// Enter edit mode for `id`, replacing any edit in progress
    ///
    /// Unsaved changes of a previous edit are dropped without confirmation.
    pub fn begin_edit(&mut self, id: &TaskId) -> bool {
        let Some(draft) = self.get(id).map(TaskDraft::from_task) else {
            return false;
        };

        if let Some(previous) = &self.editing
            && &previous.id != id
        {
            debug!(previous = %previous.id, "Discarding unsaved edit");
        }

        self.editing = Some(EditSession { id: id.clone(), draft });
        true
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        self.editing.as_ref().map(|session| &session.id)
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        self.editing.as_mut().map(|session| &mut session.draft)
    }

    /// Commit the edit draft and leave edit mode
    ///
    /// A blank draft text is refused: nothing changes and edit mode stays
    /// open. Returns true when the task was updated.
    pub fn save_edit(&mut self) -> Result<bool> {
        let Some(session) = self.editing.as_ref() else {
            return Ok(false);
        };
        if session.draft.is_blank() {
            debug!(id = %session.id, "Refusing to save blank text");
            return Ok(false);
        }

        let Some(EditSession { id, draft }) = self.editing.take() else {
            return Ok(false);
        };
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };

        task.text = draft.text;
        task.due_date = draft.due_date;
        task.priority = Some(draft.priority);
        debug!(id = %id, "Saved edit");
        self.persist()?;
        Ok(true)
    }

    /// Leave edit mode without touching the task
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // === Filtering ===

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Switch the active filter and close the filter menu
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.filter_menu_open = false;
    }

    pub fn is_filter_menu_open(&self) -> bool {
        self.filter_menu_open
    }

    pub fn toggle_filter_menu(&mut self) {
        self.filter_menu_open = !self.filter_menu_open;
    }

    pub fn filtered_tasks(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    pub fn stats(&self) -> TaskStats {
        compute_stats(&self.tasks)
    }

    fn persist(&mut self) -> Result<()> {
        save_tasks(&mut self.store, &self.key, &self.tasks)
    }
}
