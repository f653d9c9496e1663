//! Dashboard task model.
//!
//! A task carries a 1-5 priority rating, an estimated duration and an
//! optional due date. The calendar places it once `scheduled_time` is set,
//! either by the AI sort or by dropping it on a slot.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Priority rating from 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a rating, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Priority(value))
        } else {
            Err(ValidationError::invalid(
                "priority",
                format!("must be between {} and {}, got {value}", Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Time-of-day tier used by the planner.
    pub fn tier(self) -> PriorityTier {
        match self.0 {
            4..=5 => PriorityTier::High,
            3 => PriorityTier::Medium,
            _ => PriorityTier::Low,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(3)
    }
}

impl TryFrom<u8> for Priority {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Coarse priority bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityTier::Low => write!(f, "low"),
            PriorityTier::Medium => write!(f, "medium"),
            PriorityTier::High => write!(f, "high"),
        }
    }
}

fn default_estimated_minutes() -> u32 {
    60
}

/// A task on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Priority rating (1-5)
    #[serde(default)]
    pub priority: Priority,
    /// Estimated duration in minutes
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
    /// Due date (calendar day, no time)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Start of the calendar slot the task occupies
    #[serde(default)]
    pub scheduled_time: Option<DateTime<FixedOffset>>,
    /// Whether the task is completed
    #[serde(default)]
    pub completed: bool,
    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh id and default values.
    pub fn new(title: impl Into<String>) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            estimated_minutes: default_estimated_minutes(),
            due_date: None,
            scheduled_time: None,
            completed: false,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_minutes))
    }

    /// End of the scheduled slot.
    pub fn scheduled_end(&self) -> Option<DateTime<FixedOffset>> {
        self.scheduled_time.map(|start| start + self.duration())
    }

    /// Scheduled interval in UTC.
    pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.scheduled_time.map(|start| {
            let start = start.with_timezone(&Utc);
            (start, start + self.duration())
        })
    }

    /// Incomplete and not yet on the calendar: what the AI sort places.
    pub fn is_pending(&self) -> bool {
        !self.completed && self.scheduled_time.is_none()
    }

    /// Whether the scheduled interval intersects `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match self.interval() {
            Some((s, e)) => s < end && e > start,
            None => false,
        }
    }

    /// Check the invariants every stored task satisfies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::invalid("id", "must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        if self.estimated_minutes == 0 {
            return Err(ValidationError::invalid(
                "estimated_minutes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_estimated_minutes")]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            estimated_minutes: default_estimated_minutes(),
            due_date: None,
            tags: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Build the stored task, trimming the title and validating.
    pub fn into_task(self, created_at: DateTime<Utc>) -> Result<Task, ValidationError> {
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            priority: self.priority,
            estimated_minutes: self.estimated_minutes,
            due_date: self.due_date,
            scheduled_time: None,
            completed: false,
            tags: self.tags,
            created_at,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Read a field that is present, `null` included, as `Some`. Together with
/// `#[serde(default)]` this keeps "absent" (`None`) apart from "clear"
/// (`Some(None)`).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update. `Some(None)` clears an optional field; in JSON that is
/// an explicit `null`, while an absent key leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<Option<DateTime<FixedOffset>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Apply onto a copy of `task`, returning the validated result.
    pub fn apply(&self, task: &Task) -> Result<Task, ValidationError> {
        let mut updated = task.clone();
        if let Some(title) = &self.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(minutes) = self.estimated_minutes {
            updated.estimated_minutes = minutes;
        }
        if let Some(due) = self.due_date {
            updated.due_date = due;
        }
        if let Some(slot) = self.scheduled_time {
            updated.scheduled_time = slot;
        }
        if let Some(completed) = self.completed {
            updated.completed = completed;
        }
        if let Some(tags) = &self.tags {
            updated.tags = tags.clone();
        }
        updated.validate()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn priority_bounds() {
        assert!(Priority::new(0).is_err());
        assert!(Priority::new(6).is_err());
        assert_eq!(Priority::new(5).unwrap().value(), 5);
        assert_eq!(Priority::default().value(), 3);
    }

    #[test]
    fn priority_tiers() {
        assert_eq!(Priority::new(5).unwrap().tier(), PriorityTier::High);
        assert_eq!(Priority::new(4).unwrap().tier(), PriorityTier::High);
        assert_eq!(Priority::new(3).unwrap().tier(), PriorityTier::Medium);
        assert_eq!(Priority::new(2).unwrap().tier(), PriorityTier::Low);
        assert_eq!(Priority::new(1).unwrap().tier(), PriorityTier::Low);
    }

    #[test]
    fn priority_deserialization_is_checked() {
        let ok: Priority = serde_json::from_str("4").unwrap();
        assert_eq!(ok.value(), 4);
        assert!(serde_json::from_str::<Priority>("9").is_err());
    }

    #[test]
    fn task_deserializes_with_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","title":"Write report","created_at":"2026-10-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(task.priority.value(), 3);
        assert_eq!(task.estimated_minutes, 60);
        assert!(task.is_pending());
        assert!(task.tags.is_empty());
    }

    #[test]
    fn scheduled_end_and_overlap() {
        let mut task = Task::new("Review");
        task.estimated_minutes = 90;
        task.scheduled_time = Some(at("2026-10-19T09:00:00-07:00"));
        assert_eq!(task.scheduled_end(), Some(at("2026-10-19T10:30:00-07:00")));

        let (start, end) = task.interval().unwrap();
        assert!(task.overlaps(start, end));
        assert!(!task.overlaps(end, end + Duration::minutes(30)));
        assert!(task.overlaps(end - Duration::minutes(1), end + Duration::minutes(30)));
        assert!(!task.is_pending());
    }

    #[test]
    fn completed_task_is_not_pending() {
        let mut task = Task::new("Done already");
        task.completed = true;
        assert!(!task.is_pending());
    }

    #[test]
    fn new_task_rejects_blank_title_and_zero_duration() {
        assert!(NewTask::new("   ").into_task(Utc::now()).is_err());
        assert!(NewTask::new("ok").with_duration(0).into_task(Utc::now()).is_err());
        let task = NewTask::new("  Plan sprint  ").into_task(Utc::now()).unwrap();
        assert_eq!(task.title, "Plan sprint");
    }

    #[test]
    fn patch_clears_and_sets_fields() {
        let due = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let task = NewTask::new("Draft")
            .with_due_date(due)
            .with_description("first pass")
            .into_task(Utc::now())
            .unwrap();

        let patch = TaskPatch {
            due_date: Some(None),
            description: Some(None),
            priority: Some(Priority::new(5).unwrap()),
            ..TaskPatch::default()
        };
        let updated = patch.apply(&task).unwrap();
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.description, None);
        assert_eq!(updated.priority.value(), 5);
        assert_eq!(updated.title, "Draft");
    }

    #[test]
    fn patch_json_null_clears_and_absent_keeps() {
        let clear: TaskPatch = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(clear.due_date, Some(None));
        assert!(!clear.is_empty());

        let keep: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(keep.is_empty());

        let set: TaskPatch =
            serde_json::from_str(r#"{"scheduled_time": "2026-10-20T09:00:00-07:00"}"#).unwrap();
        assert_eq!(set.scheduled_time, Some(Some(at("2026-10-20T09:00:00-07:00"))));
    }

    #[test]
    fn clearing_patch_round_trips() {
        let patch = TaskPatch {
            due_date: Some(None),
            description: Some(None),
            title: Some("Renamed".to_string()),
            ..TaskPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Renamed", "description": null, "due_date": null})
        );
        let back: TaskPatch = serde_json::from_value(json).unwrap();
        assert_eq!(back, patch);
    }

    #[test]
    fn patch_validation_leaves_original_untouched() {
        let task = Task::new("Keep me");
        let patch = TaskPatch {
            title: Some("  ".to_string()),
            ..TaskPatch::default()
        };
        assert!(patch.apply(&task).is_err());
        assert_eq!(task.title, "Keep me");
        assert!(TaskPatch::default().is_empty());
    }
}
