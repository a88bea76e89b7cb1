//! Draft field state for the new-task form and the edit session

use chrono::NaiveDate;

use crate::domain::{Priority, Task, TaskId};

/// Editable fields of a task before they are committed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Draft pre-populated from a task's current values
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            due_date: task.due_date,
            priority: task.effective_priority(),
        }
    }

    /// True when the text is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The single task currently in edit mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub draft: TaskDraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(TaskDraft::default().is_blank());
        assert!(TaskDraft::new("   \t\n").is_blank());
        assert!(!TaskDraft::new(" x ").is_blank());
    }

    #[test]
    fn test_from_task_defaults_unset_priority() {
        let mut task = Task::new("old", None, Priority::Low);
        task.priority = None;
        let draft = TaskDraft::from_task(&task);
        assert_eq!(draft.text, "old");
        assert_eq!(draft.priority, Priority::Medium);
    }
}
