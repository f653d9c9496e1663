//! The dashboard "AI sort".
//!
//! A deterministic heuristic, not an optimizer. Pending tasks are ordered by
//! priority and due date, given a time-of-day bucket from their priority tier
//! and a day offset from their due date, then nudged forward until they no
//! longer collide with anything already on the calendar.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::storage::PlannerConfig;
use crate::task::{PriorityTier, Task};
use crate::time::local_datetime;

/// One placement produced by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: String,
    pub scheduled_time: DateTime<FixedOffset>,
    /// Human-readable explanation of the placement.
    pub reason: String,
}

/// Local hour a priority tier is bucketed into.
pub fn bucket_hour(tier: PriorityTier, config: &PlannerConfig) -> u32 {
    match tier {
        PriorityTier::High => config.high_priority_hour,
        PriorityTier::Medium => config.medium_priority_hour,
        PriorityTier::Low => config.low_priority_hour,
    }
}

/// Candidate order: priority desc, due date asc (undated last), then
/// creation time and id for a stable tie-break.
fn candidate_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

struct WorkDay<'a> {
    tz: &'a Tz,
    config: &'a PlannerConfig,
}

impl WorkDay<'_> {
    fn open(&self, date: NaiveDate) -> DateTime<Utc> {
        local_datetime(self.tz, date, self.config.work_day_start_hour, 0).with_timezone(&Utc)
    }

    fn close(&self, date: NaiveDate) -> DateTime<Utc> {
        local_datetime(self.tz, date, self.config.work_day_end_hour, 0).with_timezone(&Utc)
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(self.tz).date_naive()
    }

    fn next_open(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let date = self.local_date(at);
        let next = date.succ_opt().unwrap_or(date);
        self.open(next)
    }

    /// Earliest start at or after `start` that keeps `[start, start+duration)`
    /// inside a work day and clear of `occupied`.
    fn place(
        &self,
        mut start: DateTime<Utc>,
        duration: Duration,
        occupied: &[(DateTime<Utc>, DateTime<Utc>)],
    ) -> DateTime<Utc> {
        loop {
            let date = self.local_date(start);
            let open = self.open(date);
            let close = self.close(date);

            if start < open {
                start = open;
                continue;
            }
            let fits_in_day = duration <= close - open;
            if fits_in_day && start + duration > close {
                start = self.next_open(start);
                continue;
            }
            // Tasks longer than the work day start at the bell.
            if !fits_in_day && start != open {
                start = self.next_open(start);
                continue;
            }

            let end = start + duration;
            let conflict_end = occupied
                .iter()
                .filter(|(s, e)| *s < end && *e > start)
                .map(|(_, e)| *e)
                .max();
            match conflict_end {
                Some(e) => start = e,
                None => return start,
            }
        }
    }
}

/// Compute placements for every pending task in `tasks` without mutating
/// anything.
///
/// Completed and already-scheduled tasks are left alone; their intervals
/// count as occupied time.
pub fn plan<'a, I>(tasks: I, now: DateTime<Utc>, tz: Tz, config: &PlannerConfig) -> Vec<Assignment>
where
    I: IntoIterator<Item = &'a Task>,
{
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    let mut occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> =
        tasks.iter().filter_map(|t| t.interval()).collect();

    let mut candidates: Vec<&Task> = tasks.iter().copied().filter(|t| t.is_pending()).collect();
    candidates.sort_by(|a, b| candidate_order(a, b));

    let day = WorkDay { tz: &tz, config };
    let local_now = now.with_timezone(&tz);
    let today = local_now.date_naive();
    let per_day = i64::from(config.tasks_per_day.max(1));

    let mut assignments = Vec::with_capacity(candidates.len());
    for (index, task) in candidates.into_iter().enumerate() {
        let tier = task.priority.tier();
        let hour = bucket_hour(tier, config);

        let (offset, basis) = match task.due_date {
            Some(due) => {
                let days_until = (due - today).num_days();
                let offset = if days_until <= 0 {
                    0
                } else {
                    (days_until - i64::from(task.priority.value())).max(0)
                };
                (offset, format!("due {due}"))
            }
            None => (
                index as i64 / per_day,
                "no due date".to_string(),
            ),
        };

        let target_day = today + Duration::days(offset);
        let mut start = local_datetime(&tz, target_day, hour, 0).with_timezone(&Utc);
        if start < now {
            let next_hour = local_datetime(&tz, today, local_now.hour() + 1, 0).with_timezone(&Utc);
            start = if next_hour < day.close(today) {
                next_hour
            } else {
                let tomorrow = today.succ_opt().unwrap_or(today);
                local_datetime(&tz, tomorrow, hour, 0).with_timezone(&Utc)
            };
        }

        let duration = task.duration();
        let placed = day.place(start, duration, &occupied);
        occupied.push((placed, placed + duration));

        let scheduled_time = placed.with_timezone(&tz).fixed_offset();
        tracing::debug!(
            task_id = %task.id,
            priority = task.priority.value(),
            offset,
            start = %scheduled_time,
            "planned task"
        );
        assignments.push(Assignment {
            task_id: task.id.clone(),
            scheduled_time,
            reason: format!(
                "{} {} priority, {}; placed {}",
                task.priority,
                tier,
                basis,
                scheduled_time.format("%a %b %-d %H:%M")
            ),
        });
    }
    assignments
}

/// Plan `tasks` and write the resulting scheduled times back.
pub fn sort_tasks_by_ai(
    tasks: &mut [Task],
    now: DateTime<Utc>,
    tz: Tz,
    config: &PlannerConfig,
) -> Vec<Assignment> {
    let assignments = plan(tasks.iter(), now, tz, config);
    for assignment in &assignments {
        if let Some(task) = tasks.iter_mut().find(|t| t.id == assignment.task_id) {
            task.scheduled_time = Some(assignment.scheduled_time);
        }
    }
    assignments
}
