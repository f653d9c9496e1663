use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the task store produces an Event.
/// View and notification layers drain them after each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        task_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    TaskCompletionToggled {
        task_id: String,
        completed: bool,
        at: DateTime<Utc>,
    },
    /// Task placed on a calendar slot, by drag-drop or direct assignment.
    TaskScheduled {
        task_id: String,
        scheduled_time: DateTime<FixedOffset>,
        at: DateTime<Utc>,
    },
    TaskUnscheduled {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// The AI sort ran and placed `scheduled` tasks.
    TasksSorted {
        scheduled: usize,
        at: DateTime<Utc>,
    },
    /// A drop was rejected (malformed payload or unknown task).
    DropIgnored {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Task the event refers to, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Event::TaskAdded { task_id, .. }
            | Event::TaskUpdated { task_id, .. }
            | Event::TaskDeleted { task_id, .. }
            | Event::TaskCompletionToggled { task_id, .. }
            | Event::TaskScheduled { task_id, .. }
            | Event::TaskUnscheduled { task_id, .. } => Some(task_id),
            Event::TasksSorted { .. } | Event::DropIgnored { .. } => None,
        }
    }
}
