//! Deadline negotiation: decide whether a deadline is realistic given the
//! free time before it, and draft an extension request when it is not.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{ActionOutcome, ScheduleUpdate};
use crate::plan::{PlanTask, Prioritizer};
use crate::scheduler::FreeSlot;

/// Minimum extension suggested, in hours.
const MIN_EXTENSION_HOURS: f64 = 24.0;
/// Slack added on top of the estimated work, in hours.
const EXTENSION_SLACK_HOURS: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineAnalysis {
    pub task_id: String,
    pub current_deadline: DateTime<FixedOffset>,
    pub suggested_deadline: DateTime<FixedOffset>,
    pub extension_hours: f64,
    pub available_minutes: i64,
    pub task_duration_minutes: i64,
    pub other_tasks_minutes: i64,
    pub email: EmailTemplate,
}

fn human(dt: DateTime<FixedOffset>, tz: Tz) -> String {
    dt.with_timezone(&tz).format("%B %d, %Y at %I:%M %p").to_string()
}

fn email_template(
    task: &PlanTask,
    current: DateTime<FixedOffset>,
    suggested: DateTime<FixedOffset>,
    tz: Tz,
) -> EmailTemplate {
    let description = if task.description.trim().is_empty() {
        "Task"
    } else {
        task.description.as_str()
    };
    let days = (suggested - current).num_days();
    let plural = if days == 1 { "" } else { "s" };
    let body = format!(
        "Dear [Recipient],\n\n\
         I hope this message finds you well. I am writing to request a deadline extension for \
         the following task:\n\n\
         Task: {description}\n\
         Current Deadline: {}\n\
         Requested New Deadline: {}\n\
         Extension Requested: {days} day{plural}\n\n\
         After reviewing my current workload and calendar availability, I have determined that \
         the current deadline is not feasible given the scope of work required. The additional \
         time will allow me to complete this task thoroughly.\n\n\
         I am happy to discuss this further and can provide more details about my current \
         commitments if needed.\n\n\
         Thank you for your understanding.\n\n\
         Best regards,\n\
         [Your Name]",
        human(current, tz),
        human(suggested, tz),
    );
    EmailTemplate {
        subject: format!("Request for Deadline Extension: {description}"),
        body,
        snippet: format!("Requesting {days}-day extension for {description}"),
    }
}

/// Free minutes before `deadline`, clipping slots that run past it.
fn available_before(free: &[FreeSlot], deadline: DateTime<FixedOffset>) -> i64 {
    free.iter()
        .filter(|s| s.start < deadline)
        .map(|s| (s.end.min(deadline) - s.start).num_minutes().max(0))
        .sum()
}

/// Analyze a task's deadline.
///
/// Without `task_id` the highest-scoring task with a deadline is used. A
/// caller-supplied `new_deadline` replaces the computed suggestion.
pub fn negotiate_deadline(
    tasks: &[PlanTask],
    free: &[FreeSlot],
    task_id: Option<&str>,
    new_deadline: Option<DateTime<FixedOffset>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> ActionOutcome<DeadlineAnalysis> {
    if tasks.is_empty() {
        tracing::warn!("deadline negotiation requested with no tasks");
        return ActionOutcome::declined("No tasks provided.", "Tasks list is empty.");
    }

    let prioritizer = Prioritizer::new(now);
    let task = match task_id {
        Some(id) => match tasks.iter().find(|t| t.task_id == id) {
            Some(task) => task,
            None => {
                return ActionOutcome::declined("Task not found.", "Task ID not found in task list.")
            }
        },
        None => {
            let mut best: Option<(f64, &PlanTask)> = None;
            for task in tasks.iter().filter(|t| t.deadline_iso.is_some()) {
                let score = prioritizer.score(task);
                if score > 0.0 && best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, task));
                }
            }
            match best {
                Some((_, task)) => task,
                None => {
                    return ActionOutcome::declined(
                        "No tasks with deadlines found.",
                        "Cannot negotiate without an existing deadline.",
                    )
                }
            }
        }
    };

    let Some(deadline) = task.deadline_iso else {
        return ActionOutcome::declined(
            "Task does not have a deadline.",
            "Cannot negotiate a deadline for a task without one.",
        );
    };

    let available = available_before(free, deadline);
    let needed = task.duration_minutes;
    let others: i64 = tasks
        .iter()
        .filter(|t| t.task_id != task.task_id && t.deadline_iso.is_some())
        .fold(0_i64, |acc, t| acc.saturating_add(t.duration_minutes));
    let hours_left = (deadline.with_timezone(&Utc) - now).num_seconds() as f64 / 3600.0;
    let needs_extension = (available as f64) < needed as f64 + others as f64 * 0.5 || hours_left < 24.0;

    if !needs_extension {
        return ActionOutcome::declined(
            "Deadline appears realistic based on available time.",
            format!(
                "{available} minutes available before the deadline, task requires {needed} \
                 minutes. Current deadline is feasible."
            ),
        );
    }

    let (suggested, extension_hours) = match new_deadline {
        Some(requested) => {
            let hours = (requested - deadline).num_seconds() as f64 / 3600.0;
            (requested, hours)
        }
        None => {
            let hours = ((needed as f64 + others as f64 * 0.3) / 60.0 + EXTENSION_SLACK_HOURS)
                .max(MIN_EXTENSION_HOURS);
            let Some(suggested) = TimeDelta::try_seconds((hours * 3600.0).round() as i64)
                .and_then(|extension| deadline.checked_add_signed(extension))
            else {
                return ActionOutcome::declined(
                    "Extension is out of range.",
                    format!("{needed} minutes of work cannot be added to the deadline."),
                );
            };
            (suggested, hours)
        }
    };
    let suggested = suggested.with_timezone(&tz).fixed_offset();

    let email = email_template(task, deadline, suggested, tz);
    let reasoning = format!(
        "Current deadline ({}) is unrealistic given {available} minutes available and {needed} \
         minutes required. Suggested extension: {extension_hours:.0} hours to {}.",
        deadline.to_rfc3339(),
        suggested.to_rfc3339()
    );
    tracing::info!(task_id = %task.task_id, extension_hours, "deadline negotiated");

    let updates = task
        .scheduled_time
        .map(|at| {
            vec![ScheduleUpdate::new(
                task,
                at,
                format!("Placement unchanged; deadline extension to {} requested.", suggested.to_rfc3339()),
            )]
        })
        .unwrap_or_default();

    ActionOutcome::done(
        format!("Suggested deadline extension: {extension_hours:.0} hours"),
        reasoning,
        DeadlineAnalysis {
            task_id: task.task_id.clone(),
            current_deadline: deadline,
            suggested_deadline: suggested,
            extension_hours,
            available_minutes: available,
            task_duration_minutes: needed,
            other_tasks_minutes: others,
            email,
        },
        updates,
    )
}
