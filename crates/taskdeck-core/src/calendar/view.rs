//! Day / week / month calendar ranges.
//!
//! Weeks start on Sunday. Month grids always have six rows so the layout does
//! not jump when navigating between months.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};
use crate::storage::PlannerConfig;
use crate::time::local_datetime;

/// Calendar display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    #[default]
    Week,
    Month,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if end < start {
            DateRange { start: end, end: start }
        } else {
            DateRange { start, end }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl CalendarView {
    /// Range of days shown when the view is anchored at `anchor`.
    pub fn range(self, anchor: NaiveDate) -> DateRange {
        match self {
            CalendarView::Day => DateRange::new(anchor, anchor),
            CalendarView::Week => {
                let start = week_start(anchor);
                DateRange::new(start, start + Duration::days(6))
            }
            CalendarView::Month => {
                let start = month_start(anchor);
                let end = start
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(start);
                DateRange::new(start, end)
            }
        }
    }

    /// Anchor after moving `steps` views forward (negative moves back).
    ///
    /// Month navigation clamps the day (Jan 31 + 1 month is Feb 28/29).
    pub fn shift(self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        match self {
            CalendarView::Day => anchor + Duration::days(i64::from(steps)),
            CalendarView::Week => anchor + Duration::weeks(i64::from(steps)),
            CalendarView::Month => {
                let months = Months::new(steps.unsigned_abs());
                let shifted = if steps >= 0 {
                    anchor.checked_add_months(months)
                } else {
                    anchor.checked_sub_months(months)
                };
                shifted.unwrap_or(anchor)
            }
        }
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarView::Day => write!(f, "day"),
            CalendarView::Week => write!(f, "week"),
            CalendarView::Month => write!(f, "month"),
        }
    }
}

impl FromStr for CalendarView {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(CalendarView::Day),
            "week" => Ok(CalendarView::Week),
            "month" => Ok(CalendarView::Month),
            other => Err(ValidationError::invalid(
                "view",
                format!("expected day, week or month, got '{other}'"),
            )),
        }
    }
}

/// 6x7 month grid starting on the Sunday on or before the first of the month.
pub fn month_grid(anchor: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let first = week_start(month_start(anchor));
    (0..6)
        .map(|row| std::array::from_fn(|col| first + Duration::days(row * 7 + col as i64)))
        .collect()
}

/// A calendar drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn contains(&self, at: DateTime<FixedOffset>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Work-day slot ladder for `date`, `slot_minutes` apart.
pub fn day_slots(
    date: NaiveDate,
    tz: &Tz,
    config: &PlannerConfig,
    slot_minutes: u32,
) -> Result<Vec<TimeSlot>> {
    if slot_minutes == 0 {
        return Err(ValidationError::invalid("slot_minutes", "must be greater than zero").into());
    }
    let open = local_datetime(tz, date, config.work_day_start_hour, 0).fixed_offset();
    let close = local_datetime(tz, date, config.work_day_end_hour, 0).fixed_offset();
    if close <= open {
        return Err(ValidationError::InvalidTimeRange {
            start: open,
            end: close,
        }
        .into());
    }

    let step = Duration::minutes(i64::from(slot_minutes));
    let mut slots = Vec::new();
    let mut cursor = open;
    while cursor < close {
        let end = (cursor + step).min(close);
        slots.push(TimeSlot { start: cursor, end });
        cursor = end;
    }
    Ok(slots)
}
