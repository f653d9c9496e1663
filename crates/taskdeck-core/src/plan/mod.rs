//! Planning pipeline.
//!
//! Turns a [`PlanRequest`] (tasks, free calendar slots, habits) into a
//! [`PlanReport`]: tasks are scored, grouped, fitted into the free slots with
//! breaks, and habits are ranked into active and back-burner sets.

pub mod grouping;
pub mod habits;
pub mod priority;
pub mod report;

pub use grouping::{batch_similar_tasks, group_tasks, Category};
pub use habits::{HabitInput, HabitPlan, HabitStatus, KeywordSentiment, SentimentAnalyzer};
pub use priority::{Prioritizer, ScoredTask, Urgency};
pub use report::{Feature, FeatureSuggestion, PlanReport};

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, Result, ValidationError};
use crate::scheduler::{FreeSlot, SlotScheduler};
use crate::storage::Config;
use crate::task::Task;
use crate::time::{local_datetime, parse_tz};

/// Longest task the pipeline accepts: one leap year.
pub const MAX_TASK_MINUTES: i64 = 366 * 24 * 60;

fn default_duration_minutes() -> i64 {
    60
}

/// A task as submitted to the planning pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTask {
    pub task_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    /// RFC 3339 deadline with offset
    #[serde(default, alias = "deadline")]
    pub deadline_iso: Option<DateTime<FixedOffset>>,
    /// 0-100
    #[serde(default)]
    pub importance: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Caller-assigned group; the grouper's category is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Current placement, used by quick actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<FixedOffset>>,
}

impl Default for PlanTask {
    fn default() -> Self {
        PlanTask {
            task_id: String::new(),
            description: String::new(),
            duration_minutes: default_duration_minutes(),
            deadline_iso: None,
            importance: 0,
            tags: Vec::new(),
            group: None,
            scheduled_time: None,
        }
    }
}

impl PlanTask {
    /// Bridge a dashboard task into the pipeline.
    ///
    /// Importance is the priority rating times 20 and the deadline is the
    /// last minute of the due day in `tz`.
    pub fn from_task(task: &Task, tz: &Tz) -> Self {
        PlanTask {
            task_id: task.id.clone(),
            description: task.title.clone(),
            duration_minutes: i64::from(task.estimated_minutes),
            deadline_iso: task
                .due_date
                .map(|due| local_datetime(tz, due, 23, 59).fixed_offset()),
            importance: i64::from(task.priority.value()) * 20,
            tags: task.tags.clone(),
            group: None,
            scheduled_time: task.scheduled_time,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.task_id.trim().is_empty() {
            return Err(ValidationError::invalid("task_id", "must not be empty"));
        }
        if self.duration_minutes <= 0 {
            return Err(ValidationError::invalid(
                "duration_minutes",
                format!("must be positive for task {}", self.task_id),
            ));
        }
        if self.duration_minutes > MAX_TASK_MINUTES {
            return Err(ValidationError::invalid(
                "duration_minutes",
                format!("must be at most {MAX_TASK_MINUTES} for task {}", self.task_id),
            ));
        }
        Ok(())
    }
}

impl From<&Task> for PlanTask {
    /// Uses UTC for the end of the due day.
    fn from(task: &Task) -> Self {
        PlanTask::from_task(task, &Tz::UTC)
    }
}

/// Input of a planning run. `tasks` and `calendar_free` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub tasks: Vec<PlanTask>,
    pub calendar_free: Vec<FreeSlot>,
    #[serde(default)]
    pub habits: Vec<HabitInput>,
    /// IANA timezone; the configured timezone when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl PlanRequest {
    /// Timezone named by the request, else the configured one.
    pub fn resolve_tz(&self, config: &Config) -> Result<Tz> {
        match self.timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => parse_tz(name),
            _ => config.tz(),
        }
    }

    /// Reject empty ids, duplicate ids, durations outside
    /// `1..=MAX_TASK_MINUTES` and inverted slots.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.task_id.as_str()) {
                return Err(CoreError::DuplicateTask(task.task_id.clone()));
            }
        }
        for slot in &self.calendar_free {
            slot.validate()?;
        }
        Ok(())
    }
}

/// Run the full pipeline.
pub fn process_plan(request: PlanRequest, now: DateTime<Utc>, config: &Config) -> Result<PlanReport> {
    request.validate()?;
    let tz = request.resolve_tz(config)?;
    let task_count = request.tasks.len();

    let mut scored = Prioritizer::new(now).prioritize_tasks(request.tasks);
    group_tasks(&mut scored);
    let group_count = grouping::count_groups(&scored);

    let habits = habits::process_habits(
        &request.habits,
        &request.calendar_free,
        now,
        tz,
        &config.habits,
        &KeywordSentiment,
    );

    let mut scheduler = SlotScheduler::new(&request.calendar_free, tz, config.scheduling.clone());
    let schedule = scheduler.schedule_tasks(scored);

    let cursor_prompt = report::cursor_prompt(&schedule, tz);
    let validation_summary = report::validation_summary(task_count, group_count, &habits, &schedule);
    tracing::info!(
        tasks = task_count,
        entries = schedule.len(),
        habits = habits.len(),
        timezone = %tz,
        "plan processed"
    );

    Ok(PlanReport {
        features: report::features(),
        schedule,
        habits,
        feature_suggestions: report::feature_suggestions(),
        cursor_prompt,
        validation_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{NewTask, Priority};
    use chrono::NaiveDate;

    #[test]
    fn request_requires_tasks_and_slots() {
        assert!(serde_json::from_str::<PlanRequest>(r#"{"tasks": []}"#).is_err());
        assert!(serde_json::from_str::<PlanRequest>(r#"{"calendar_free": []}"#).is_err());
        let req: PlanRequest =
            serde_json::from_str(r#"{"tasks": [], "calendar_free": []}"#).unwrap();
        assert!(req.habits.is_empty());
        assert!(req.timezone.is_none());
    }

    #[test]
    fn plan_task_defaults() {
        let t: PlanTask = serde_json::from_str(r#"{"task_id": "t1"}"#).unwrap();
        assert_eq!(t.duration_minutes, 60);
        assert_eq!(t.importance, 0);
        assert!(t.deadline_iso.is_none());
    }

    #[test]
    fn naive_deadline_is_rejected() {
        let err = serde_json::from_str::<PlanTask>(
            r#"{"task_id": "t1", "deadline_iso": "2026-10-20T17:00:00"}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let req = PlanRequest {
            tasks: vec![
                PlanTask {
                    task_id: "a".into(),
                    ..PlanTask::default()
                },
                PlanTask {
                    task_id: "a".into(),
                    ..PlanTask::default()
                },
            ],
            calendar_free: vec![],
            habits: vec![],
            timezone: None,
        };
        assert!(matches!(req.validate(), Err(CoreError::DuplicateTask(_))));
    }

    #[test]
    fn duration_is_capped() {
        let mut task = PlanTask {
            task_id: "a".into(),
            duration_minutes: MAX_TASK_MINUTES,
            ..PlanTask::default()
        };
        assert!(task.validate().is_ok());
        task.duration_minutes = 1_000_000_000_000_000;
        assert!(task.validate().is_err());
    }

    #[test]
    fn bridges_dashboard_task() {
        let task = NewTask::new("Ship release")
            .with_priority(Priority::new(4).unwrap())
            .with_duration(90)
            .with_due_date(NaiveDate::from_ymd_opt(2026, 10, 23).unwrap())
            .into_task(Utc::now())
            .unwrap();
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        let p = PlanTask::from_task(&task, &tz);
        assert_eq!(p.importance, 80);
        assert_eq!(p.duration_minutes, 90);
        assert_eq!(
            p.deadline_iso.unwrap().to_rfc3339(),
            "2026-10-23T23:59:00-07:00"
        );
        assert_eq!(PlanTask::from(&task).deadline_iso.unwrap().to_rfc3339(), "2026-10-23T23:59:00+00:00");
    }

    #[test]
    fn unknown_request_timezone_is_an_error() {
        let req = PlanRequest {
            tasks: vec![],
            calendar_free: vec![],
            habits: vec![],
            timezone: Some("Nowhere/Special".into()),
        };
        let err = process_plan(req, Utc::now(), &Config::default()).unwrap_err();
        assert!(matches!(err, CoreError::Timezone(_)));
    }
}
