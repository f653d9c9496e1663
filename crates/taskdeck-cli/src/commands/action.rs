//! One-click actions over an action request document.
//!
//! A declined action still exits 0; its outcome carries `success: false`
//! and the reason.

use std::path::PathBuf;

use chrono::DateTime;
use clap::{Args, Subcommand};
use taskdeck_core::actions::{
    apply_quick_tags, create_deep_block, negotiate_deadline, snooze_task, ActionRequest,
    DEFAULT_BLOCK_MINUTES, DEFAULT_SNOOZE_MINUTES,
};
use taskdeck_core::Config;

use super::io::{parse_now, read_json, write_json, CliResult};

#[derive(Args)]
pub struct ActionArgs {
    /// Request JSON file (stdin when omitted or "-")
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Reference time (RFC 3339), defaults to now
    #[arg(long, global = true)]
    now: Option<String>,
    #[command(subcommand)]
    action: QuickAction,
}

#[derive(Subcommand)]
pub enum QuickAction {
    /// Pack deep-focus tasks into one uninterrupted block
    DeepBlock {
        /// Block length in minutes
        #[arg(long, default_value_t = DEFAULT_BLOCK_MINUTES)]
        minutes: i64,
    },
    /// Push a scheduled task back
    Snooze {
        /// Task ID
        task_id: String,
        /// Minutes to snooze
        #[arg(long, default_value_t = DEFAULT_SNOOZE_MINUTES)]
        minutes: i64,
    },
    /// Check a deadline and draft an extension request
    Deadline {
        /// Task ID, defaults to the most pressing task with a deadline
        #[arg(long)]
        task: Option<String>,
        /// Requested new deadline (RFC 3339)
        #[arg(long)]
        new_deadline: Option<String>,
    },
    /// Tag tasks and batch them by tag
    Tag {
        /// Tag to apply (repeatable); auto-detects when none are given
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Do not auto-detect tags from descriptions
        #[arg(long)]
        no_detect: bool,
    },
}

pub fn run(args: ActionArgs) -> CliResult {
    let request: ActionRequest = read_json(args.input.as_deref())?;
    request.validate()?;
    let now = parse_now(args.now.as_deref())?;

    match args.action {
        QuickAction::DeepBlock { minutes } => {
            let config = Config::load()?;
            let tz = request.resolve_tz(&config)?;
            let outcome = create_deep_block(&request.tasks, &request.calendar_free, minutes, now, tz);
            write_json(&outcome, None)
        }
        QuickAction::Snooze { task_id, minutes } => {
            let outcome = snooze_task(&request.tasks, &task_id, minutes);
            write_json(&outcome, None)
        }
        QuickAction::Deadline { task, new_deadline } => {
            let config = Config::load()?;
            let tz = request.resolve_tz(&config)?;
            let new_deadline = new_deadline
                .as_deref()
                .map(DateTime::parse_from_rfc3339)
                .transpose()
                .map_err(|e| format!("invalid --new-deadline: {e}"))?;
            let outcome = negotiate_deadline(
                &request.tasks,
                &request.calendar_free,
                task.as_deref(),
                new_deadline,
                now,
                tz,
            );
            write_json(&outcome, None)
        }
        QuickAction::Tag { tags, no_detect } => {
            let outcome = apply_quick_tags(&request.tasks, &tags, !no_detect);
            write_json(&outcome, None)
        }
    }
}
