//! TaskManager - a task-list (to-do) manager for the terminal
//!
//! Tasks have a text, a completion flag, a creation time, an optional due
//! date and a priority. The whole collection lives in memory while the
//! program runs and is rewritten to a local key-value store after every
//! change.
//!
//! # Modules
//!
//! - [`domain`] - Task, TaskId, Priority, Filter
//! - [`manager`] - TaskManager: state, operations, persistence
//! - [`format`] - Display formatting for dates and times
//! - [`tui`] - Interactive terminal UI
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use kvstore::FileStore;
//! use taskmanager::{Priority, TaskDraft, TaskManager};
//!
//! let mut manager = TaskManager::open(FileStore::open("store")?, "todos")?;
//! *manager.draft_mut() = TaskDraft::new("Buy milk").with_priority(Priority::High);
//! let id = manager.add_task()?.expect("text is not blank");
//! manager.toggle_task(&id)?;
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod format;
pub mod manager;
pub mod tui;

// Re-export commonly used types
pub use config::Config;
pub use domain::{Emphasis, Filter, IdResolver, Priority, Task, TaskId};
pub use manager::{EditSession, ManagerError, TaskDraft, TaskManager, TaskStats};
