//! Task Manager - terminal task-list manager
//!
//! CLI entry point: launches the TUI or runs a single task operation.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use kvstore::{FileStore, KeyValueStore};
use tracing::info;

use taskmanager::cli::{Cli, Command};
use taskmanager::config::Config;
use taskmanager::domain::{Filter, IdResolver, Priority, Task, TaskId, priority_label};
use taskmanager::format::{format_created_at, format_due_date, format_time_ago};
use taskmanager::manager::{TaskDraft, TaskManager};
use taskmanager::tui;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskmanager")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file, never to the terminal the TUI draws on
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("taskmanager.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(store) = cli.store {
        config.storage.path = store;
    }

    info!(
        "Task manager loaded config: store={}, key={}",
        config.storage.path.display(),
        config.storage.key
    );

    let store = FileStore::open(&config.storage.path)
        .with_context(|| format!("Failed to open store at {}", config.storage.path.display()))?;
    info!("Opened task store at {}", store.root().display());
    let mut manager = TaskManager::open(store, config.storage.key.clone()).context("Failed to load tasks")?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let poll_interval = Duration::from_millis(config.ui.tick_rate_ms);
            tui::run(manager, poll_interval).await
        }
        Command::List { filter } => cmd_list(&mut manager, filter),
        Command::Add { text, due, priority } => cmd_add(&mut manager, text, due, priority),
        Command::Toggle { id } => cmd_toggle(&mut manager, &id),
        Command::Edit {
            id,
            text,
            due,
            clear_due,
            priority,
        } => cmd_edit(&mut manager, &id, text, due, clear_due, priority),
        Command::Delete { id } => cmd_delete(&mut manager, &id),
        Command::Stats => cmd_stats(&manager),
    }
}

/// Print the filtered view followed by the summary line
fn cmd_list<S: KeyValueStore>(manager: &mut TaskManager<S>, filter: Filter) -> Result<()> {
    manager.set_filter(filter);

    let tasks = manager.filtered_tasks();
    if tasks.is_empty() {
        println!("{}", "No tasks found".dimmed());
    }
    for task in tasks {
        println!("{}", task_line(task));
    }

    let stats = manager.stats();
    println!(
        "{}",
        format!(
            "{} tasks | {} completed, {} remaining",
            stats.total, stats.completed, stats.active
        )
        .dimmed()
    );
    Ok(())
}

fn cmd_add<S: KeyValueStore>(
    manager: &mut TaskManager<S>,
    text: String,
    due: Option<NaiveDate>,
    priority: Priority,
) -> Result<()> {
    *manager.draft_mut() = TaskDraft::new(text).with_due_date(due).with_priority(priority);

    match manager.add_task()? {
        Some(id) => println!("{} Added task: {}", "✓".green(), id.short().cyan()),
        None => bail!("Task text cannot be empty"),
    }
    Ok(())
}

fn cmd_toggle<S: KeyValueStore>(manager: &mut TaskManager<S>, reference: &str) -> Result<()> {
    let Some(id) = resolve_id(manager, reference)? else {
        println!("No task matches '{}'", reference);
        return Ok(());
    };

    manager.toggle_task(&id)?;
    if let Some(task) = manager.get(&id) {
        let state = if task.completed { "completed".green() } else { "active".yellow() };
        println!("{} {} is now {}", "✓".green(), task.text, state);
    }
    Ok(())
}

fn cmd_edit<S: KeyValueStore>(
    manager: &mut TaskManager<S>,
    reference: &str,
    text: Option<String>,
    due: Option<NaiveDate>,
    clear_due: bool,
    priority: Option<Priority>,
) -> Result<()> {
    let Some(id) = resolve_id(manager, reference)? else {
        println!("No task matches '{}'", reference);
        return Ok(());
    };

    manager.begin_edit(&id);
    if let Some(draft) = manager.edit_draft_mut() {
        if let Some(text) = text {
            draft.text = text;
        }
        if clear_due {
            draft.due_date = None;
        } else if due.is_some() {
            draft.due_date = due;
        }
        if let Some(priority) = priority {
            draft.priority = priority;
        }
    }

    if !manager.save_edit()? {
        manager.cancel_edit();
        bail!("Task text cannot be empty");
    }
    if let Some(task) = manager.get(&id) {
        println!("{} Updated: {}", "✓".green(), task_line(task));
    }
    Ok(())
}

fn cmd_delete<S: KeyValueStore>(manager: &mut TaskManager<S>, reference: &str) -> Result<()> {
    let Some(id) = resolve_id(manager, reference)? else {
        println!("No task matches '{}'", reference);
        return Ok(());
    };

    manager.delete_task(&id)?;
    println!("{} Deleted task: {}", "✓".green(), id.short());
    Ok(())
}

fn cmd_stats<S: KeyValueStore>(manager: &TaskManager<S>) -> Result<()> {
    let stats = manager.stats();
    println!("Total:     {}", stats.total);
    println!("Completed: {}", stats.completed.to_string().green());
    println!("Active:    {}", stats.active.to_string().yellow());
    Ok(())
}

/// Resolve a full id, or a unique prefix or suffix of one
fn resolve_id<S: KeyValueStore>(manager: &TaskManager<S>, reference: &str) -> Result<Option<TaskId>> {
    let resolver = IdResolver::new(manager.tasks().iter().map(|task| &task.id));
    match resolver.resolve(reference) {
        Ok(id) => Ok(id),
        Err(candidates) => {
            let candidates: Vec<String> = candidates.iter().map(|id| id.to_string()).collect();
            bail!("Ambiguous task id '{}', candidates: {}", reference, candidates.join(", "))
        }
    }
}

fn task_line(task: &Task) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let text = if task.completed {
        task.text.strikethrough().dimmed()
    } else {
        task.text.normal()
    };
    let priority = match task.priority {
        Some(Priority::High) => priority_label(task.priority).red(),
        Some(Priority::Medium) => priority_label(task.priority).yellow(),
        Some(Priority::Low) => priority_label(task.priority).green(),
        None => priority_label(task.priority).dimmed(),
    };

    let mut line = format!(
        "{:>8}  {} {}  {}  {}",
        task.id.short().cyan(),
        checkbox,
        text,
        priority,
        format!("{} ({})", format_created_at(task.created_at), format_time_ago(task.created_at)).dimmed()
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", format_due_date(due)));
    }
    line
}
