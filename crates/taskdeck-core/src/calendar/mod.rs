//! Calendar views, time slots and drag-drop payloads.

pub mod drop;
pub mod view;

pub use drop::DropPayload;
pub use view::{day_slots, month_grid, CalendarView, DateRange, TimeSlot};
