//! Deep-work blocks: a run of focus tasks packed into one uninterrupted
//! slot, morning first.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{shift_minutes, ActionOutcome, ScheduleUpdate};
use crate::plan::{PlanTask, Prioritizer};
use crate::scheduler::FreeSlot;

pub const DEFAULT_BLOCK_MINUTES: i64 = 120;

const FOCUS_KEYWORDS: [&str; 19] = [
    "code",
    "programming",
    "write",
    "design",
    "analyze",
    "research",
    "plan",
    "strategy",
    "think",
    "solve",
    "create",
    "develop",
    "build",
    "architect",
    "review",
    "debug",
    "draft",
    "study",
    "implement",
];

/// Focus work: keyword match, importance of 70+, or an hour or longer.
pub fn requires_deep_focus(task: &PlanTask) -> bool {
    let description = task.description.to_lowercase();
    FOCUS_KEYWORDS.iter().any(|k| description.contains(k))
        || task.importance >= 70
        || task.duration_minutes >= 60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepBlock {
    pub start_time: DateTime<FixedOffset>,
    pub duration_minutes: i64,
    pub tasks: Vec<ScheduleUpdate>,
    pub notifications_paused: bool,
}

fn period(hour: u32) -> &'static str {
    match hour {
        8..=11 => "morning",
        12..=16 => "afternoon",
        _ => "evening",
    }
}

/// Build a deep-work block of `duration_minutes` (non-positive means the
/// two-hour default).
pub fn create_deep_block(
    tasks: &[PlanTask],
    free: &[FreeSlot],
    duration_minutes: i64,
    now: DateTime<Utc>,
    tz: Tz,
) -> ActionOutcome<DeepBlock> {
    if tasks.is_empty() {
        tracing::warn!("deep block requested with no tasks");
        return ActionOutcome::declined(
            "No tasks provided for deep block creation.",
            "Tasks list is empty.",
        );
    }
    if free.is_empty() {
        tracing::warn!("deep block requested with no free slots");
        return ActionOutcome::declined(
            "No available calendar slots for deep block.",
            "No free time slots available.",
        );
    }
    let duration_minutes = if duration_minutes <= 0 {
        tracing::warn!(duration_minutes, "invalid block length, using default");
        DEFAULT_BLOCK_MINUTES
    } else {
        duration_minutes
    };

    let prioritizer = Prioritizer::new(now);
    let mut focus: Vec<(f64, &PlanTask)> = tasks
        .iter()
        .filter(|t| requires_deep_focus(t))
        .map(|t| (prioritizer.score(t), t))
        .collect();
    if focus.is_empty() {
        return ActionOutcome::declined(
            "No deep-focus tasks found. Deep blocks work best for tasks requiring concentration.",
            "No tasks identified as requiring deep focus.",
        );
    }
    focus.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut slots: Vec<&FreeSlot> = free
        .iter()
        .filter(|s| s.duration_minutes() >= duration_minutes)
        .collect();
    slots.sort_by_key(|s| s.start);
    let morning = slots
        .iter()
        .find(|s| (8..12).contains(&s.start.with_timezone(&tz).hour()));
    let Some(slot) = morning.or(slots.first()).copied() else {
        return ActionOutcome::declined(
            format!("No available time slot found for {duration_minutes}-minute deep block."),
            "Insufficient free time for deep work block.",
        );
    };

    let mut selected = Vec::new();
    let mut total = 0;
    for (_, task) in &focus {
        if task.duration_minutes > 0 && task.duration_minutes <= duration_minutes - total {
            selected.push(*task);
            total += task.duration_minutes;
        }
        if total >= duration_minutes {
            break;
        }
    }
    if selected.is_empty() {
        return ActionOutcome::declined(
            "Could not fit any tasks into the deep block.",
            "Tasks too large for available block duration.",
        );
    }

    let block_start = slot.start.with_timezone(&tz).fixed_offset();
    let mut cursor = block_start;
    let updates: Vec<ScheduleUpdate> = selected
        .iter()
        .map(|task| {
            let update = ScheduleUpdate::new(
                task,
                cursor,
                "Scheduled in deep work block. High priority task requiring focused attention. \
                 Notifications paused during this block.",
            );
            cursor = shift_minutes(cursor, task.duration_minutes).unwrap_or(cursor);
            update
        })
        .collect();

    let reasoning = format!(
        "Created {duration_minutes}-minute deep work block in the {} ({}). Selected {} \
         deep-focus tasks by priority. Notifications will be paused during this block.",
        period(block_start.hour()),
        block_start.to_rfc3339(),
        updates.len()
    );
    tracing::info!(start = %block_start, tasks = updates.len(), "deep block created");

    ActionOutcome::done(
        format!(
            "Created {duration_minutes}-minute deep work block with {} tasks.",
            updates.len()
        ),
        reasoning,
        DeepBlock {
            start_time: block_start,
            duration_minutes,
            tasks: updates.clone(),
            notifications_paused: true,
        },
        updates,
    )
}
