//! One-click actions over a plan: deep-work blocks, snoozing, deadline
//! negotiation and quick tags.
//!
//! Every action returns an [`ActionOutcome`]. A declined action (nothing to
//! do, nothing fits) is reported with `success: false` and a reason rather
//! than an error; errors are reserved for malformed input.

pub mod deadline;
pub mod deep_block;
pub mod quick_tags;
pub mod snooze;

pub use deadline::{negotiate_deadline, DeadlineAnalysis, EmailTemplate};
pub use deep_block::{create_deep_block, requires_deep_focus, DeepBlock, DEFAULT_BLOCK_MINUTES};
pub use quick_tags::{apply_quick_tags, detect_tags, TagReport};
pub use snooze::{snooze_task, SnoozeReport, DEFAULT_SNOOZE_MINUTES};

use chrono::{DateTime, Duration, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plan::PlanTask;
use crate::scheduler::FreeSlot;
use crate::storage::Config;
use crate::time::parse_tz;

/// Tasks and free time an action operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub tasks: Vec<PlanTask>,
    #[serde(default)]
    pub calendar_free: Vec<FreeSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ActionRequest {
    pub fn resolve_tz(&self, config: &Config) -> Result<Tz> {
        match self.timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => parse_tz(name),
            _ => config.tz(),
        }
    }

    /// Reject empty ids and out-of-range durations before any action runs.
    pub fn validate(&self) -> Result<()> {
        for task in &self.tasks {
            task.validate()?;
        }
        Ok(())
    }

    pub fn find(&self, task_id: &str) -> Option<&PlanTask> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }
}

/// `at` moved by `minutes`, or `None` when the result leaves chrono's range.
pub(crate) fn shift_minutes(at: DateTime<FixedOffset>, minutes: i64) -> Option<DateTime<FixedOffset>> {
    Duration::try_minutes(minutes).and_then(|d| at.checked_add_signed(d))
}

/// New placement for a task proposed by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub task_id: String,
    pub description: String,
    pub scheduled_time: DateTime<FixedOffset>,
    pub duration_minutes: i64,
    pub justification: String,
}

impl ScheduleUpdate {
    pub fn new(task: &PlanTask, scheduled_time: DateTime<FixedOffset>, justification: impl Into<String>) -> Self {
        ScheduleUpdate {
            task_id: task.task_id.clone(),
            description: task.description.clone(),
            scheduled_time,
            duration_minutes: task.duration_minutes,
            justification: justification.into(),
        }
    }
}

/// Result of an action. `detail` carries the action-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome<T> {
    pub success: bool,
    pub message: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<T>,
    #[serde(default)]
    pub schedule_updates: Vec<ScheduleUpdate>,
}

impl<T> ActionOutcome<T> {
    pub fn declined(message: impl Into<String>, reasoning: impl Into<String>) -> Self {
        ActionOutcome {
            success: false,
            message: message.into(),
            reasoning: reasoning.into(),
            detail: None,
            schedule_updates: Vec::new(),
        }
    }

    pub fn done(
        message: impl Into<String>,
        reasoning: impl Into<String>,
        detail: T,
        schedule_updates: Vec<ScheduleUpdate>,
    ) -> Self {
        ActionOutcome {
            success: true,
            message: message.into(),
            reasoning: reasoning.into(),
            detail: Some(detail),
            schedule_updates,
        }
    }
}
