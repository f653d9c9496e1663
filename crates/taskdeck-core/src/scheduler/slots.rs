//! Free-slot scheduler.
//!
//! Places scored tasks into a list of free calendar slots:
//! - Meetings get a buffer before and after
//! - Deep-focus work prefers slots that start before noon
//! - Tasks that fit nowhere are split across slots when allowed
//! - Tasks that still cannot be placed stay in the schedule, unplaced

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{breaks, sort_chronologically, ScheduleEntry};
use crate::error::ValidationError;
use crate::plan::grouping::batch_similar_tasks;
use crate::plan::priority::ScoredTask;
use crate::storage::SchedulingConfig;

const DEEP_FOCUS_KEYWORDS: [&str; 11] = [
    "code", "programming", "write", "draft", "design", "plan", "study", "research", "analyze",
    "implement", "develop",
];

const MEETING_KEYWORDS: [&str; 9] = [
    "meeting",
    "call",
    "conference",
    "discussion",
    "standup",
    "sync",
    "presentation",
    "demo",
    "interview",
];

/// Local hour before which a slot counts as a morning slot.
const NOON: u32 = 12;

/// A free interval on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    #[serde(rename = "start_iso")]
    pub start: DateTime<FixedOffset>,
    #[serde(rename = "end_iso")]
    pub end: DateTime<FixedOffset>,
}

impl FreeSlot {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        FreeSlot { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end <= self.start {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

fn mentions(description: &str, group: &str, keywords: &[&str]) -> bool {
    let description = description.to_lowercase();
    let group = group.to_lowercase();
    keywords
        .iter()
        .any(|k| description.contains(k) || group.contains(k))
}

/// Work that benefits from an uninterrupted morning.
pub fn is_deep_focus_task(description: &str, group: &str) -> bool {
    mentions(description, group, &DEEP_FOCUS_KEYWORDS)
}

/// Collaborative work that needs context-switch buffers.
pub fn is_meeting_task(description: &str, group: &str) -> bool {
    mentions(description, group, &MEETING_KEYWORDS)
}

/// Scheduler over a shrinking list of free slots.
pub struct SlotScheduler {
    config: SchedulingConfig,
    tz: Tz,
    free: Vec<FreeSlot>,
}

impl SlotScheduler {
    /// Slots are sorted by start; empty or inverted slots are dropped.
    pub fn new(slots: &[FreeSlot], tz: Tz, config: SchedulingConfig) -> Self {
        let mut free: Vec<FreeSlot> = slots.iter().copied().filter(|s| s.end > s.start).collect();
        free.sort_by_key(|s| s.start);
        Self { config, tz, free }
    }

    /// Free slots not yet consumed.
    pub fn remaining(&self) -> &[FreeSlot] {
        &self.free
    }

    fn is_morning(&self, slot: &FreeSlot) -> bool {
        slot.start.with_timezone(&self.tz).hour() < NOON
    }

    fn first_fitting(&self, minutes: i64, prefer_morning: bool) -> Option<usize> {
        let fits = |s: &FreeSlot| s.duration_minutes() >= minutes;
        if prefer_morning {
            if let Some(i) = self
                .free
                .iter()
                .position(|s| fits(s) && self.is_morning(s))
            {
                return Some(i);
            }
        }
        self.free.iter().position(fits)
    }

    /// Remove `[slot.start, used_until)` from the slot at `index`.
    fn consume(&mut self, index: usize, used_until: DateTime<FixedOffset>) {
        if used_until < self.free[index].end {
            self.free[index].start = used_until;
        } else {
            self.free.remove(index);
        }
    }

    /// Schedule one task, returning its entries (several when split).
    pub fn schedule_task(&mut self, task: &ScoredTask) -> Vec<ScheduleEntry> {
        let minutes = task.task.duration_minutes;
        let group = task.group_name();
        let deep_focus = is_deep_focus_task(&task.task.description, &group);
        let meeting = is_meeting_task(&task.task.description, &group);
        let buffer = self.config.meeting_buffer_minutes;

        let required = if meeting { minutes + 2 * buffer } else { minutes };
        if let Some(index) = self.first_fitting(required, deep_focus) {
            let slot = self.free[index];
            let morning = self.is_morning(&slot);
            let start = if meeting {
                slot.start + Duration::minutes(buffer)
            } else {
                slot.start
            };
            let used_until = start + Duration::minutes(minutes + if meeting { buffer } else { 0 });
            self.consume(index, used_until);

            let mut reasons = Vec::new();
            if deep_focus && morning {
                reasons.push("Morning slot for deep-focus work".to_string());
            }
            if meeting {
                reasons.push(format!("{buffer}-min buffers for context switching"));
            }
            if !task.task.tags.is_empty() {
                reasons.push(format!("Tags: {}", task.task.tags.join(", ")));
            }
            let justification = if reasons.is_empty() {
                "Scheduled in the earliest slot that fits.".to_string()
            } else {
                format!("{}.", reasons.join(". "))
            };
            tracing::debug!(task_id = %task.task.task_id, start = %start, "placed task");
            return vec![ScheduleEntry::for_task(task, Some(start), minutes, justification)];
        }

        if self.config.allow_split && !meeting {
            if let Some(parts) = self.split(task) {
                return parts;
            }
        }

        tracing::debug!(task_id = %task.task.task_id, minutes, "no slot fits task");
        vec![ScheduleEntry::for_task(
            task,
            None,
            minutes,
            "Could not be scheduled: not enough free time. Consider rescheduling or splitting.",
        )]
    }

    /// Spread a task over slots in chronological order.
    ///
    /// Every placed part is at least `min_split_minutes` unless it finishes
    /// the task. Whatever does not fit becomes a final unplaced part.
    /// Returns `None`, consuming nothing, when no part could be placed.
    fn split(&mut self, task: &ScoredTask) -> Option<Vec<ScheduleEntry>> {
        let total = task.task.duration_minutes;
        let min_part = self.config.min_split_minutes.max(1);

        let mut remaining = total;
        let mut placed: Vec<(DateTime<FixedOffset>, i64)> = Vec::new();
        let mut index = 0;
        while remaining > 0 && index < self.free.len() {
            let slot = self.free[index];
            let part = remaining.min(slot.duration_minutes());
            if part >= min_part.min(remaining) {
                placed.push((slot.start, part));
                remaining -= part;
                if slot.start + Duration::minutes(part) < slot.end {
                    self.free[index].start = slot.start + Duration::minutes(part);
                    index += 1;
                } else {
                    self.free.remove(index);
                }
            } else {
                index += 1;
            }
        }

        if placed.is_empty() {
            return None;
        }

        let total_parts = (placed.len() + usize::from(remaining > 0)) as u32;
        let mut entries: Vec<ScheduleEntry> = placed
            .into_iter()
            .enumerate()
            .map(|(i, (start, minutes))| {
                let number = i as u32 + 1;
                let mut entry = ScheduleEntry::for_task(
                    task,
                    Some(start),
                    minutes,
                    format!(
                        "Split across slots for lack of continuous time. Part {number} of {total_parts}."
                    ),
                );
                entry.split = true;
                entry.part_number = Some(number);
                entry.total_parts = Some(total_parts);
                entry
            })
            .collect();

        if remaining > 0 {
            let mut rest = ScheduleEntry::for_task(
                task,
                None,
                remaining,
                format!(
                    "Part {total_parts} could not be scheduled for lack of free time. Consider rescheduling."
                ),
            );
            rest.split = true;
            rest.part_number = Some(total_parts);
            rest.total_parts = Some(total_parts);
            entries.push(rest);
        }
        tracing::debug!(task_id = %task.task.task_id, parts = total_parts, "split task");
        Some(entries)
    }

    /// Schedule all tasks: by score, batched by group, then ordered
    /// chronologically with breaks inserted.
    pub fn schedule_tasks(&mut self, mut tasks: Vec<ScoredTask>) -> Vec<ScheduleEntry> {
        tasks.sort_by(|a, b| b.score.total_cmp(&a.score));
        let mut entries = Vec::with_capacity(tasks.len());
        for batch in batch_similar_tasks(tasks) {
            for task in &batch {
                entries.extend(self.schedule_task(task));
            }
        }
        sort_chronologically(&mut entries);
        breaks::insert_breaks(entries, &self.config)
    }
}
