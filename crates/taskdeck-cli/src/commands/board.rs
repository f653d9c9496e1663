//! Dashboard commands over a board document.
//!
//! Each invocation loads the board (`--board FILE` or stdin), applies one
//! operation and prints the resulting board. Nothing is kept between runs.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate};
use clap::{Args, Subcommand};
use taskdeck_core::time::parse_tz;
use taskdeck_core::{Config, NewTask, Priority, TaskPatch, TaskStore};

use super::io::{load_store, parse_now, split_list, write_json, CliResult};

#[derive(Args)]
pub struct BoardArgs {
    /// Board JSON file (stdin when omitted or "-")
    #[arg(long, global = true)]
    board: Option<PathBuf>,
    /// Write the board back to the --board file instead of stdout
    #[arg(long, global = true)]
    in_place: bool,
    #[command(subcommand)]
    action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Print the board
    Show,
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Priority rating 1-5
        #[arg(long, default_value_t = 3)]
        priority: u8,
        /// Estimated duration in minutes
        #[arg(long, default_value_t = 60)]
        minutes: u32,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        minutes: Option<u32>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// Comma-separated tags (replaces existing tags)
        #[arg(long)]
        tags: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Toggle a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Place pending tasks with the priority/due-date heuristic
    Sort {
        /// Planning time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<String>,
        /// IANA timezone, defaults to the configured one
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Drop a dragged task on a calendar slot
    Drop {
        /// Drag payload: {"task_id": ...} or a bare task id
        payload: String,
        /// Slot start (RFC 3339)
        #[arg(long)]
        slot: String,
    },
    /// Take a task off the calendar
    Unschedule {
        /// Task ID
        id: String,
    },
}

fn priority(value: u8) -> CliResult<Priority> {
    Ok(Priority::new(value)?)
}

pub fn run(args: BoardArgs) -> CliResult {
    if args.in_place && args.board.is_none() {
        return Err("--in-place requires --board".into());
    }
    let mut store = load_store(args.board.as_deref())?;

    match args.action {
        BoardAction::Show => {}
        BoardAction::Add {
            title,
            description,
            priority: rating,
            minutes,
            due,
            tags,
        } => {
            let mut new_task = NewTask::new(title)
                .with_priority(priority(rating)?)
                .with_duration(minutes)
                .with_tags(tags.as_deref().map(split_list).unwrap_or_default());
            if let Some(description) = description {
                new_task = new_task.with_description(description);
            }
            if let Some(due) = due {
                new_task = new_task.with_due_date(due);
            }
            let task = store.add_task(new_task)?;
            eprintln!("Task created: {}", task.id);
        }
        BoardAction::Update {
            id,
            title,
            description,
            clear_description,
            priority: rating,
            minutes,
            due,
            clear_due,
            tags,
        } => {
            let patch = TaskPatch {
                title,
                description: if clear_description { Some(None) } else { description.map(Some) },
                priority: rating.map(priority).transpose()?,
                estimated_minutes: minutes,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                tags: tags.as_deref().map(split_list),
                ..TaskPatch::default()
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            store.update_task(&id, patch)?;
        }
        BoardAction::Delete { id } => {
            store.delete_task(&id)?;
        }
        BoardAction::Toggle { id } => {
            let completed = store.toggle_complete(&id)?;
            eprintln!("Task {id} completed: {completed}");
        }
        BoardAction::Sort { now, timezone } => {
            let config = Config::load()?;
            let tz = match timezone.as_deref() {
                Some(name) => parse_tz(name)?,
                None => config.tz()?,
            };
            let now = parse_now(now.as_deref())?;
            for assignment in store.sort_tasks_by_ai(now, tz, &config.planner) {
                eprintln!("{}: {}", assignment.task_id, assignment.reason);
            }
        }
        BoardAction::Drop { payload, slot } => {
            let slot = DateTime::parse_from_rfc3339(&slot)
                .map_err(|e| format!("invalid --slot '{slot}': {e}"))?;
            if store.handle_drop(&payload, slot).is_none() {
                eprintln!("drop ignored");
            }
        }
        BoardAction::Unschedule { id } => {
            store.unschedule_task(&id)?;
        }
    }

    log_events(&mut store);
    let target = if args.in_place { args.board.as_deref() } else { None };
    write_json(&store.to_board(), target)
}

fn log_events(store: &mut TaskStore) {
    for event in store.drain_events() {
        match serde_json::to_string(&event) {
            Ok(json) => tracing::info!(event = %json, "board event"),
            Err(e) => tracing::warn!(error = %e, "unserializable board event"),
        }
    }
}
