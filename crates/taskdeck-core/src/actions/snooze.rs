//! One-click snooze.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{shift_minutes, ActionOutcome, ScheduleUpdate};
use crate::plan::{PlanTask, MAX_TASK_MINUTES};

pub const DEFAULT_SNOOZE_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnoozeReport {
    pub snoozed: ScheduleUpdate,
    pub rescheduled: Vec<ScheduleUpdate>,
}

/// Two tasks are related when they share an explicit group or at least two
/// description words.
fn related(a: &PlanTask, b: &PlanTask) -> bool {
    if let (Some(x), Some(y)) = (&a.group, &b.group) {
        if x == y {
            return true;
        }
    }
    let a_desc = a.description.to_lowercase();
    let b_desc = b.description.to_lowercase();
    let a_words: HashSet<&str> = a_desc.split_whitespace().collect();
    let b_words: HashSet<&str> = b_desc.split_whitespace().collect();
    a_words.intersection(&b_words).count() >= 2
}

/// Push a scheduled task back by `minutes` (0 means the 30-minute default).
///
/// Related tasks that would still be running when the snoozed task starts
/// are moved to right after it.
pub fn snooze_task(tasks: &[PlanTask], task_id: &str, minutes: i64) -> ActionOutcome<SnoozeReport> {
    if tasks.is_empty() {
        tracing::warn!("snooze requested with no tasks");
        return ActionOutcome::declined("No tasks provided.", "Tasks list is empty.");
    }
    if task_id.trim().is_empty() {
        return ActionOutcome::declined("Task ID is required.", "No task ID provided.");
    }
    let minutes = if minutes <= 0 {
        if minutes < 0 {
            tracing::warn!(minutes, "invalid snooze length, using default");
        }
        DEFAULT_SNOOZE_MINUTES
    } else {
        minutes
    };
    if minutes > MAX_TASK_MINUTES {
        return ActionOutcome::declined(
            format!("Snooze of {minutes} minutes is too long."),
            format!("Snooze length must be at most {MAX_TASK_MINUTES} minutes."),
        );
    }

    let Some(task) = tasks.iter().find(|t| t.task_id == task_id) else {
        return ActionOutcome::declined(
            format!("Task {task_id} not found."),
            "Task ID not found in task list.",
        );
    };
    let Some(current) = task.scheduled_time else {
        return ActionOutcome::declined(
            "Task is not currently scheduled.",
            "Cannot snooze an unscheduled task. Schedule it first.",
        );
    };

    let Some(new_start) = shift_minutes(current, minutes) else {
        return ActionOutcome::declined(
            "Snoozed time is out of range.",
            "The new start time cannot be represented.",
        );
    };
    let snoozed = ScheduleUpdate::new(
        task,
        new_start,
        format!(
            "Snoozed by {minutes} minutes. Original time: {}, new time: {}.",
            current.to_rfc3339(),
            new_start.to_rfc3339()
        ),
    );

    let Some(after_snoozed) = shift_minutes(new_start, task.duration_minutes) else {
        return ActionOutcome::declined(
            "Snoozed task ends out of range.",
            format!("Task {task_id} has an invalid duration of {} minutes.", task.duration_minutes),
        );
    };
    let rescheduled: Vec<ScheduleUpdate> = tasks
        .iter()
        .filter(|other| other.task_id != task.task_id && related(other, task))
        .filter_map(|other| {
            let start = other.scheduled_time?;
            let end = shift_minutes(start, other.duration_minutes)?;
            (start < new_start && end > new_start).then(|| {
                ScheduleUpdate::new(
                    other,
                    after_snoozed,
                    format!("Moved after snoozed task {task_id} to avoid a conflict."),
                )
            })
        })
        .collect();

    tracing::info!(task_id, minutes, moved = rescheduled.len(), "task snoozed");
    let reasoning = format!(
        "Snoozed \"{}\" by {minutes} minutes to {}. {} related task(s) rescheduled to prevent \
         conflicts.",
        task.description,
        new_start.to_rfc3339(),
        rescheduled.len()
    );
    let mut updates = vec![snoozed.clone()];
    updates.extend(rescheduled.iter().cloned());
    ActionOutcome::done(
        format!("Task snoozed by {minutes} minutes"),
        reasoning,
        SnoozeReport {
            snoozed,
            rescheduled,
        },
        updates,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn task(id: &str, description: &str, start: Option<&str>, minutes: i64) -> PlanTask {
        PlanTask {
            task_id: id.to_string(),
            description: description.to_string(),
            duration_minutes: minutes,
            scheduled_time: start.map(at),
            ..PlanTask::default()
        }
    }

    #[test]
    fn moves_task_and_related_conflicts() {
        let tasks = vec![
            task("a", "Prepare quarterly report", Some("2026-10-19T09:00:00-07:00"), 60),
            // Related by words, running over the new start.
            task("b", "Review quarterly report", Some("2026-10-19T08:45:00-07:00"), 60),
            // Related but finished before the new start.
            task("c", "Print quarterly report", Some("2026-10-19T08:00:00-07:00"), 30),
            // Unrelated.
            task("d", "Walk dog", Some("2026-10-19T09:00:00-07:00"), 60),
        ];
        let out = snooze_task(&tasks, "a", 30);
        assert!(out.success);
        let report = out.detail.unwrap();
        assert_eq!(report.snoozed.scheduled_time, at("2026-10-19T09:30:00-07:00"));
        assert_eq!(report.rescheduled.len(), 1);
        assert_eq!(report.rescheduled[0].task_id, "b");
        assert_eq!(report.rescheduled[0].scheduled_time, at("2026-10-19T10:30:00-07:00"));
        assert_eq!(out.schedule_updates.len(), 2);
    }

    #[test]
    fn shared_group_counts_as_related() {
        let mut a = task("a", "alpha", Some("2026-10-19T09:00:00-07:00"), 30);
        let mut b = task("b", "beta", Some("2026-10-19T09:00:00-07:00"), 60);
        a.group = Some("Client".into());
        b.group = Some("Client".into());
        let out = snooze_task(&[a, b], "a", 15);
        assert_eq!(out.detail.unwrap().rescheduled.len(), 1);
    }

    #[test]
    fn zero_minutes_means_default() {
        let tasks = vec![task("a", "x", Some("2026-10-19T09:00:00-07:00"), 30)];
        let out = snooze_task(&tasks, "a", 0);
        assert_eq!(out.message, "Task snoozed by 30 minutes");
    }

    #[test]
    fn declines_out_of_range_lengths() {
        let tasks = vec![task("a", "x", Some("2026-10-19T09:00:00-07:00"), 30)];
        let out = snooze_task(&tasks, "a", 1_000_000_000_000_000);
        assert!(!out.success);
        assert!(out.schedule_updates.is_empty());

        let huge = vec![task("a", "x", Some("2026-10-19T09:00:00-07:00"), i64::MAX)];
        assert!(!snooze_task(&huge, "a", 15).success);
    }

    #[test]
    fn declines_unknown_or_unscheduled() {
        let tasks = vec![task("a", "x", None, 30)];
        assert!(!snooze_task(&tasks, "zzz", 15).success);
        assert!(!snooze_task(&tasks, "a", 15).success);
        assert!(!snooze_task(&tasks, "", 15).success);
        assert!(!snooze_task(&[], "a", 15).success);
    }
}
