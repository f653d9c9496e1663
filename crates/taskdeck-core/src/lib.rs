//! # Taskdeck Core Library
//!
//! This library provides the core logic for taskdeck, a task-planning
//! dashboard. All operations are available through the standalone `taskdeck`
//! CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Task store**: in-memory, insertion-ordered task collection with
//!   drag-and-drop scheduling and the one-click heuristic planner
//! - **Calendar**: day/week/month view ranges, month grids and drop payloads
//! - **Planning pipeline**: scoring, grouping, slot scheduling with breaks,
//!   habits and a short report
//! - **Quick actions**: deep-work blocks, snooze, deadline negotiation and
//!   quick tags
//! - **Storage**: TOML configuration
//!
//! ## Key Components
//!
//! - [`TaskStore`]: Task collection and dashboard operations
//! - [`CalendarView`]: Visible date range of the calendar
//! - [`process_plan`]: Full planning run over a [`PlanRequest`]
//! - [`Config`]: Application configuration management

pub mod actions;
pub mod calendar;
pub mod error;
pub mod events;
pub mod plan;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod task;
pub mod time;

pub use actions::{ActionOutcome, ActionRequest, ScheduleUpdate};
pub use calendar::{CalendarView, DateRange, DropPayload, TimeSlot};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use plan::{process_plan, PlanReport, PlanRequest, PlanTask, ScoredTask};
pub use scheduler::{Assignment, FreeSlot, ScheduleEntry, SlotScheduler};
pub use storage::Config;
pub use store::{Board, TaskStore};
pub use task::{NewTask, Priority, Task, TaskPatch};
