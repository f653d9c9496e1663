//! In-memory task store backing the dashboard.
//!
//! The store is the only mutable state in a session. View layers call the
//! operations here (add, update, delete, toggle, sort, drop) and re-render
//! from [`TaskStore::tasks`]; notification layers drain [`Event`]s.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::calendar::DropPayload;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::scheduler::planner::{self, Assignment};
use crate::storage::PlannerConfig;
use crate::task::{NewTask, Task, TaskPatch};

/// Serializable snapshot of the store, used to move state in and out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Insertion-ordered task collection plus pending events.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: IndexMap<String, Task>,
    events: Vec<Event>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot, validating every task.
    pub fn from_board(board: Board) -> Result<Self> {
        let mut tasks = IndexMap::with_capacity(board.tasks.len());
        for task in board.tasks {
            task.validate()?;
            if tasks.contains_key(&task.id) {
                return Err(CoreError::DuplicateTask(task.id));
            }
            tasks.insert(task.id.clone(), task);
        }
        Ok(TaskStore {
            tasks,
            events: Vec::new(),
        })
    }

    pub fn to_board(&self) -> Board {
        Board {
            tasks: self.tasks.values().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Create a task and return it.
    pub fn add_task(&mut self, new_task: NewTask) -> Result<&Task> {
        let task = new_task.into_task(Utc::now())?;
        let id = task.id.clone();
        tracing::info!(task_id = %id, title = %task.title, "task added");
        self.emit(Event::TaskAdded {
            task_id: id.clone(),
            title: task.title.clone(),
            at: Utc::now(),
        });
        let (index, _) = self.tasks.insert_full(id, task);
        Ok(&self.tasks[index])
    }

    /// Apply a partial update. The task is unchanged if validation fails.
    ///
    /// Besides `TaskUpdated`, a patch that moves the task on or off the
    /// calendar or flips its completed flag emits the same event the
    /// dedicated operation would.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<&Task> {
        let current = self
            .tasks
            .get(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        let updated = patch.apply(current)?;
        let slot_change = (current.scheduled_time != updated.scheduled_time).then_some(updated.scheduled_time);
        let completion_change = (current.completed != updated.completed).then_some(updated.completed);
        *self
            .tasks
            .get_mut(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))? = updated;
        tracing::debug!(task_id = %id, "task updated");
        let now = Utc::now();
        self.emit(Event::TaskUpdated {
            task_id: id.to_string(),
            at: now,
        });
        match slot_change {
            Some(Some(scheduled_time)) => self.emit(Event::TaskScheduled {
                task_id: id.to_string(),
                scheduled_time,
                at: now,
            }),
            Some(None) => self.emit(Event::TaskUnscheduled {
                task_id: id.to_string(),
                at: now,
            }),
            None => {}
        }
        if let Some(completed) = completion_change {
            self.emit(Event::TaskCompletionToggled {
                task_id: id.to_string(),
                completed,
                at: now,
            });
        }
        self.get(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
    }

    /// Remove a task, returning it.
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self
            .tasks
            .shift_remove(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        tracing::info!(task_id = %id, "task deleted");
        self.emit(Event::TaskDeleted {
            task_id: task.id.clone(),
            title: task.title.clone(),
            at: Utc::now(),
        });
        Ok(task)
    }

    /// Flip the completed flag, returning the new value.
    ///
    /// The scheduled time is kept so completed work stays visible on the
    /// calendar.
    pub fn toggle_complete(&mut self, id: &str) -> Result<bool> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.emit(Event::TaskCompletionToggled {
            task_id: id.to_string(),
            completed,
            at: Utc::now(),
        });
        Ok(completed)
    }

    /// Place a task on a calendar slot.
    pub fn schedule_task(&mut self, id: &str, slot_start: DateTime<FixedOffset>) -> Result<&Task> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        task.scheduled_time = Some(slot_start);
        tracing::debug!(task_id = %id, slot = %slot_start, "task scheduled");
        self.emit(Event::TaskScheduled {
            task_id: id.to_string(),
            scheduled_time: slot_start,
            at: Utc::now(),
        });
        self.get(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
    }

    /// Take a task off the calendar.
    pub fn unschedule_task(&mut self, id: &str) -> Result<&Task> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        task.scheduled_time = None;
        self.emit(Event::TaskUnscheduled {
            task_id: id.to_string(),
            at: Utc::now(),
        });
        self.get(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))
    }

    /// Drag-drop entry point.
    ///
    /// A malformed payload or an unknown task id is logged and ignored:
    /// the store is left unchanged and `None` is returned.
    pub fn handle_drop(&mut self, payload: &str, slot_start: DateTime<FixedOffset>) -> Option<&Task> {
        let Some(drop) = DropPayload::parse(payload) else {
            tracing::warn!(payload = %payload, "ignoring malformed drop payload");
            self.emit(Event::DropIgnored {
                reason: "malformed payload".to_string(),
                at: Utc::now(),
            });
            return None;
        };
        if !self.tasks.contains_key(&drop.task_id) {
            tracing::warn!(task_id = %drop.task_id, "ignoring drop of unknown task");
            self.emit(Event::DropIgnored {
                reason: format!("unknown task {}", drop.task_id),
                at: Utc::now(),
            });
            return None;
        }
        self.schedule_task(&drop.task_id, slot_start).ok()
    }

    /// Run the AI sort over the store and apply its assignments.
    pub fn sort_tasks_by_ai(
        &mut self,
        now: DateTime<Utc>,
        tz: Tz,
        config: &PlannerConfig,
    ) -> Vec<Assignment> {
        let assignments = planner::plan(self.tasks.values(), now, tz, config);
        for assignment in &assignments {
            if let Some(task) = self.tasks.get_mut(&assignment.task_id) {
                task.scheduled_time = Some(assignment.scheduled_time);
            }
        }
        tracing::info!(scheduled = assignments.len(), "ai sort applied");
        self.emit(Event::TasksSorted {
            scheduled: assignments.len(),
            at: now,
        });
        assignments
    }

    /// Scheduled tasks intersecting `[start, end)`, earliest first.
    pub fn tasks_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Task> {
        let mut found: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| t.overlaps(start, end))
            .collect();
        found.sort_by_key(|t| t.scheduled_time.map(|s| s.with_timezone(&Utc)));
        found
    }

    /// Tasks not yet placed on the calendar, in insertion order.
    pub fn unscheduled(&self) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.scheduled_time.is_none())
            .collect()
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }
}
