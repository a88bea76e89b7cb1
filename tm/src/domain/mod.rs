//! Domain types for the task manager
//!
//! Core domain types: Task, TaskId, Priority, Filter.
//! Task is the only entity; the rest are value types.

mod filter;
mod id;
mod priority;
mod task;

pub use filter::Filter;
pub use id::{IdResolver, TaskId};
pub use priority::{Emphasis, Priority, priority_emphasis, priority_label};
pub use task::{Task, timestamp};
