//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Filter, Priority};

/// Task Manager - keep a short list of things to do
#[derive(Parser, Debug)]
#[command(
    name = "tm",
    author,
    version,
    about = "Terminal task-list manager",
    after_help = "Logs are written to: ~/.local/share/taskmanager/logs/taskmanager.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Override the store directory from the config
    #[arg(short, long, global = true, help = "Store directory")]
    pub store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute (defaults to the TUI)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the interactive TUI
    Tui,

    /// List tasks
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },

    /// Add a new task
    Add {
        /// Task text
        #[arg(required = true)]
        text: String,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<NaiveDate>,

        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task ID (full, or a unique prefix or suffix)
        #[arg(required = true)]
        id: String,
    },

    /// Change a task's text, due date or priority
    Edit {
        /// Task ID (full, or a unique prefix or suffix)
        #[arg(required = true)]
        id: String,

        /// New text
        #[arg(short, long)]
        text: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Delete a task
    Delete {
        /// Task ID (full, or a unique prefix or suffix)
        #[arg(required = true)]
        id: String,
    },

    /// Show task counts
    Stats,
}
