//! Integration tests for the dashboard workflow: adding tasks, dropping them
//! on the calendar, running the AI sort and reading views back.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use taskdeck_core::calendar::{month_grid, CalendarView};
use taskdeck_core::storage::PlannerConfig;
use taskdeck_core::time::{local_datetime, parse_tz};
use taskdeck_core::{Board, CoreError, DropPayload, Event, NewTask, Priority, TaskPatch, TaskStore};

fn slot(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn monday_morning() -> DateTime<Utc> {
    slot("2026-10-19T07:00:00-07:00").with_timezone(&Utc)
}

#[test]
fn test_drop_then_sort_keeps_manual_placement() {
    let tz = parse_tz("America/Los_Angeles").unwrap();
    let mut store = TaskStore::new();
    let pinned = store
        .add_task(NewTask::new("Standup notes").with_duration(30))
        .unwrap()
        .id
        .clone();
    let urgent = store
        .add_task(
            NewTask::new("Fix login bug")
                .with_priority(Priority::new(5).unwrap())
                .with_duration(60),
        )
        .unwrap()
        .id
        .clone();

    // Manual placement on the high-priority bucket.
    let dropped = store
        .handle_drop(&DropPayload::new(&pinned).encode(), slot("2026-10-19T09:00:00-07:00"))
        .unwrap();
    assert_eq!(dropped.scheduled_time, Some(slot("2026-10-19T09:00:00-07:00")));

    let assignments = store.sort_tasks_by_ai(monday_morning(), tz, &PlannerConfig::default());
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].task_id, urgent);
    // 09:00 is taken until 09:30.
    assert_eq!(
        store.get(&urgent).unwrap().scheduled_time,
        Some(slot("2026-10-19T09:30:00-07:00"))
    );
    assert_eq!(
        store.get(&pinned).unwrap().scheduled_time,
        Some(slot("2026-10-19T09:00:00-07:00"))
    );
}

#[test]
fn test_bad_drops_leave_store_unchanged() {
    let mut store = TaskStore::new();
    store.add_task(NewTask::new("Write report")).unwrap();
    let before = store.to_board();
    store.drain_events();

    assert!(store.handle_drop("{not json", slot("2026-10-19T09:00:00-07:00")).is_none());
    assert!(store.handle_drop(r#"{"taskId":"missing"}"#, slot("2026-10-19T09:00:00-07:00")).is_none());

    assert_eq!(store.to_board(), before);
    let events = store.drain_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| matches!(e, Event::DropIgnored { .. })));
}

#[test]
fn test_week_view_lists_scheduled_tasks() {
    let tz = parse_tz("America/Los_Angeles").unwrap();
    let mut store = TaskStore::new();
    let a = store.add_task(NewTask::new("Early")).unwrap().id.clone();
    let b = store.add_task(NewTask::new("Later")).unwrap().id.clone();
    let c = store.add_task(NewTask::new("Next week")).unwrap().id.clone();
    store.schedule_task(&b, slot("2026-10-22T14:00:00-07:00")).unwrap();
    store.schedule_task(&a, slot("2026-10-20T10:00:00-07:00")).unwrap();
    store.schedule_task(&c, slot("2026-10-27T10:00:00-07:00")).unwrap();

    let anchor = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
    let range = CalendarView::Week.range(anchor);
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2026, 10, 24).unwrap());

    let start = local_datetime(&tz, range.start, 0, 0).with_timezone(&Utc);
    let end = local_datetime(&tz, range.end, 24, 0).with_timezone(&Utc);
    let visible: Vec<&str> = store
        .tasks_between(start, end)
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(visible, vec!["Early", "Later"]);
}

#[test]
fn test_month_grid_covers_month() {
    let grid = month_grid(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap());
    assert_eq!(grid.len(), 6);
    let days: Vec<NaiveDate> = grid.iter().flatten().copied().collect();
    assert!(days.contains(&NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    assert!(days.contains(&NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()));
}

#[test]
fn test_board_roundtrip_through_json() {
    let mut store = TaskStore::new();
    let id = store
        .add_task(
            NewTask::new("Plan sprint")
                .with_due_date(NaiveDate::from_ymd_opt(2026, 10, 30).unwrap())
                .with_tags(vec!["work".into()]),
        )
        .unwrap()
        .id
        .clone();
    store.toggle_complete(&id).unwrap();

    let json = serde_json::to_string(&store.to_board()).unwrap();
    let board: Board = serde_json::from_str(&json).unwrap();
    let restored = TaskStore::from_board(board).unwrap();
    let task = restored.get(&id).unwrap();
    assert!(task.completed);
    assert_eq!(task.tags, vec!["work"]);
}

#[test]
fn test_board_with_duplicate_ids_is_rejected() {
    let mut task = taskdeck_core::Task::new("Twice");
    task.created_at = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let board = Board {
        tasks: vec![task.clone(), task],
    };
    assert!(matches!(
        TaskStore::from_board(board),
        Err(CoreError::DuplicateTask(_))
    ));
}

#[test]
fn test_invalid_update_is_rejected_atomically() {
    let mut store = TaskStore::new();
    let id = store.add_task(NewTask::new("Keep me")).unwrap().id.clone();
    let patch = TaskPatch {
        title: Some("   ".into()),
        estimated_minutes: Some(15),
        ..TaskPatch::default()
    };
    assert!(matches!(
        store.update_task(&id, patch),
        Err(CoreError::Validation(_))
    ));
    let task = store.get(&id).unwrap();
    assert_eq!(task.title, "Keep me");
    assert_eq!(task.estimated_minutes, 60);
}
