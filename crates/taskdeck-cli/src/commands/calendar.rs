//! `taskdeck calendar`: the visible range of a calendar view and the tasks
//! scheduled in it.

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use taskdeck_core::calendar::{day_slots, month_grid};
use taskdeck_core::time::{local_datetime, parse_tz};
use taskdeck_core::{CalendarView, Config, Task, TimeSlot};

use super::io::{load_store, write_json, CliResult};

#[derive(Args)]
pub struct CalendarArgs {
    /// Board JSON file (stdin when omitted or "-")
    #[arg(long)]
    board: Option<PathBuf>,
    /// day, week or month
    #[arg(long, default_value_t = CalendarView::Week)]
    view: CalendarView,
    /// Anchor date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Move the anchor this many views forward (negative for back)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    shift: i32,
    /// Slot length for the day view
    #[arg(long, default_value_t = 60)]
    slot_minutes: u32,
    /// IANA timezone, defaults to the configured one
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Serialize)]
struct CalendarOutput<'a> {
    view: CalendarView,
    anchor: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    tasks: Vec<&'a Task>,
    unscheduled: Vec<&'a Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slots: Option<Vec<TimeSlot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<[NaiveDate; 7]>>,
}

pub fn run(args: CalendarArgs) -> CliResult {
    let config = Config::load()?;
    let tz = match args.timezone.as_deref() {
        Some(name) => parse_tz(name)?,
        None => config.tz()?,
    };
    let store = load_store(args.board.as_deref())?;

    let today = Utc::now().with_timezone(&tz).date_naive();
    let anchor = args.view.shift(args.date.unwrap_or(today), args.shift);
    let range = args.view.range(anchor);
    let start = local_datetime(&tz, range.start, 0, 0).with_timezone(&Utc);
    let end = local_datetime(&tz, range.end, 24, 0).with_timezone(&Utc);

    let output = CalendarOutput {
        view: args.view,
        anchor,
        start: range.start,
        end: range.end,
        tasks: store.tasks_between(start, end),
        unscheduled: store.unscheduled(),
        slots: match args.view {
            CalendarView::Day => Some(day_slots(anchor, &tz, &config.planner, args.slot_minutes)?),
            _ => None,
        },
        grid: match args.view {
            CalendarView::Month => Some(month_grid(anchor)),
            _ => None,
        },
    };
    write_json(&output, None)
}
