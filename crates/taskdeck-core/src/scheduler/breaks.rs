//! Break insertion.
//!
//! Walks a chronological schedule counting worked minutes. Once the count
//! crosses a threshold, a break is placed so that it ends exactly when the
//! next task starts. A break that would overlap the previous item is
//! skipped, and the count keeps growing until one fits.

use chrono::{DateTime, Duration, FixedOffset};

use super::ScheduleEntry;
use crate::storage::SchedulingConfig;

/// Work thresholds and the break each one earns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPolicy {
    pub long_after_minutes: i64,
    pub long_minutes: i64,
    pub short_after_minutes: i64,
    pub short_minutes: i64,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self::from(&SchedulingConfig::default())
    }
}

impl From<&SchedulingConfig> for BreakPolicy {
    fn from(config: &SchedulingConfig) -> Self {
        Self {
            long_after_minutes: config.long_break_after_minutes,
            long_minutes: config.long_break_minutes,
            short_after_minutes: config.short_break_after_minutes,
            short_minutes: config.short_break_minutes,
        }
    }
}

impl BreakPolicy {
    /// Break length owed after `worked` minutes, if any.
    pub fn break_for(&self, worked: i64) -> Option<i64> {
        if worked <= 0 {
            None
        } else if worked >= self.long_after_minutes {
            Some(self.long_minutes)
        } else if worked >= self.short_after_minutes {
            Some(self.short_minutes)
        } else {
            None
        }
    }
}

/// Insert breaks into `entries`, which must already be in chronological
/// order. Unplaced entries pass through untouched.
pub fn insert_breaks(entries: Vec<ScheduleEntry>, config: &SchedulingConfig) -> Vec<ScheduleEntry> {
    let policy = BreakPolicy::from(config);
    let mut result = Vec::with_capacity(entries.len());
    let mut worked = 0i64;
    let mut last_end: Option<DateTime<FixedOffset>> = None;
    let mut inserted = 0usize;

    for entry in entries {
        let (Some(start), Some(end)) = (entry.scheduled_time, entry.end()) else {
            result.push(entry);
            continue;
        };

        if entry.is_break() {
            worked = 0;
        } else if let Some(minutes) = policy.break_for(worked) {
            let break_start = start - Duration::minutes(minutes);
            if last_end.map_or(true, |prev| break_start >= prev) {
                result.push(ScheduleEntry::wellness_break(break_start, minutes, worked));
                inserted += 1;
                worked = 0;
            }
        }

        if !entry.is_break() {
            worked += entry.duration_minutes;
        }
        last_end = Some(last_end.map_or(end, |prev| prev.max(end)));
        result.push(entry);
    }

    if inserted > 0 {
        tracing::debug!(breaks = inserted, "inserted breaks");
    }
    result
}
