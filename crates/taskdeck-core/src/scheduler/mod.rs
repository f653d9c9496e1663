//! Scheduling engines.
//!
//! - [`planner`]: the dashboard "AI sort" over stored tasks
//! - [`slots`]: fits scored tasks into caller-supplied free slots
//! - [`breaks`]: inserts wellness breaks into a chronological schedule

pub mod breaks;
pub mod planner;
pub mod slots;

pub use breaks::{insert_breaks, BreakPolicy};
pub use planner::{plan, sort_tasks_by_ai, Assignment};
pub use slots::{is_deep_focus_task, is_meeting_task, FreeSlot, SlotScheduler};

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::priority::{ScoredTask, Urgency};

/// Quick actions offered on every schedule item.
pub const QUICK_ACTIONS: [&str; 3] = ["Move earlier", "Mark as urgent", "Postpone"];

/// Group name used for inserted breaks.
pub const WELLNESS_GROUP: &str = "Wellness";

fn default_quick_actions() -> Vec<String> {
    QUICK_ACTIONS.iter().map(|s| s.to_string()).collect()
}

/// Kind of schedule item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Task,
    Break,
}

/// One item of a produced schedule: a task, a part of a split task or a break.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    pub task_id: String,
    pub description: String,
    pub group: String,
    pub priority: u8,
    pub urgency: Urgency,
    /// `None` when the item could not be placed
    pub scheduled_time: Option<DateTime<FixedOffset>>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub split: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_parts: Option<u32>,
    pub justification: String,
    #[serde(default = "default_quick_actions")]
    pub quick_actions: Vec<String>,
}

impl ScheduleEntry {
    /// Whole-task entry for a scored task.
    pub fn for_task(
        task: &ScoredTask,
        scheduled_time: Option<DateTime<FixedOffset>>,
        duration_minutes: i64,
        justification: impl Into<String>,
    ) -> Self {
        ScheduleEntry {
            kind: EntryKind::Task,
            task_id: task.task.task_id.clone(),
            description: task.task.description.clone(),
            group: task.group_name(),
            priority: task.priority,
            urgency: task.urgency,
            scheduled_time,
            duration_minutes,
            split: false,
            part_number: None,
            total_parts: None,
            justification: justification.into(),
            quick_actions: default_quick_actions(),
        }
    }

    /// Break of `minutes` starting at `start`.
    pub fn wellness_break(start: DateTime<FixedOffset>, minutes: i64, worked_minutes: i64) -> Self {
        ScheduleEntry {
            kind: EntryKind::Break,
            task_id: format!("break_{}", start.to_rfc3339()),
            description: format!("Break ({minutes} min)"),
            group: WELLNESS_GROUP.to_string(),
            priority: 0,
            urgency: Urgency::Low,
            scheduled_time: Some(start),
            duration_minutes: minutes,
            split: false,
            part_number: None,
            total_parts: None,
            justification: format!(
                "Inserted {minutes}-minute break after {worked_minutes} minutes of focused work \
                 to keep focus and prevent burnout."
            ),
            quick_actions: default_quick_actions(),
        }
    }

    pub fn is_break(&self) -> bool {
        self.kind == EntryKind::Break
    }

    pub fn end(&self) -> Option<DateTime<FixedOffset>> {
        self.scheduled_time
            .map(|start| start + Duration::minutes(self.duration_minutes))
    }

    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.scheduled_time.map(|start| {
            let start = start.with_timezone(&Utc);
            (start, start + Duration::minutes(self.duration_minutes))
        })
    }
}

/// Order entries by start time; unplaced entries go last in input order.
pub fn sort_chronologically(entries: &mut [ScheduleEntry]) {
    entries.sort_by_key(|e| (e.scheduled_time.is_none(), e.scheduled_time.map(|t| t.with_timezone(&Utc))));
}
