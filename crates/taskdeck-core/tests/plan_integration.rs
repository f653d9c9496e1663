//! Integration tests for the planning pipeline and quick actions, driven
//! through the JSON request format.

use chrono::{DateTime, FixedOffset, Utc};
use pretty_assertions::assert_eq;
use taskdeck_core::actions::{apply_quick_tags, snooze_task, ActionRequest};
use taskdeck_core::plan::HabitStatus;
use taskdeck_core::{process_plan, Config, CoreError, PlanRequest};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn now() -> DateTime<Utc> {
    at("2026-10-19T07:00:00-07:00").with_timezone(&Utc)
}

const REQUEST: &str = r#"{
    "tasks": [
        {
            "task_id": "t1",
            "description": "Implement search API",
            "duration_minutes": 90,
            "deadline": "2026-10-19T17:00:00-07:00",
            "importance": 80
        },
        {
            "task_id": "t2",
            "description": "Team sync meeting",
            "duration_minutes": 30,
            "importance": 50
        },
        {
            "task_id": "t3",
            "description": "Reply to emails",
            "duration_minutes": 30,
            "importance": 20
        }
    ],
    "calendar_free": [
        {"start_iso": "2026-10-19T09:00:00-07:00", "end_iso": "2026-10-19T12:00:00-07:00"},
        {"start_iso": "2026-10-19T13:00:00-07:00", "end_iso": "2026-10-19T15:00:00-07:00"}
    ],
    "habits": [
        {
            "habit_id": "h1",
            "name": "Morning run",
            "importance_statement": "This is crucial for my health"
        }
    ],
    "timezone": "America/Los_Angeles"
}"#;

#[test]
fn test_full_plan_from_json() {
    let request: PlanRequest = serde_json::from_str(REQUEST).unwrap();
    let report = process_plan(request, now(), &Config::default()).unwrap();

    let placed: Vec<(&str, Option<DateTime<FixedOffset>>)> = report
        .schedule
        .iter()
        .map(|e| (e.task_id.as_str(), e.scheduled_time))
        .collect();
    assert_eq!(placed.len(), 4);
    assert_eq!(placed[0], ("t1", Some(at("2026-10-19T09:00:00-07:00"))));
    assert_eq!(placed[1], ("t3", Some(at("2026-10-19T10:30:00-07:00"))));
    // The meeting keeps a 30-minute buffer on both sides.
    assert_eq!(placed[3], ("t2", Some(at("2026-10-19T13:30:00-07:00"))));

    let brk = &report.schedule[2];
    assert!(brk.is_break());
    assert_eq!(brk.scheduled_time, Some(at("2026-10-19T13:15:00-07:00")));
    assert_eq!(brk.duration_minutes, 15);

    assert_eq!(report.schedule[0].group, "Coding");
    assert_eq!(report.schedule[1].group, "Emails");
    assert_eq!(report.schedule[3].group, "Meetings");

    assert_eq!(report.cursor_prompt, "Start: Implement search API - 90m at 09:00");
    assert_eq!(report.features.len(), 4);
    assert_eq!(report.feature_suggestions[0].name, "Context-Aware Task Batching");
    assert!(report.validation_summary.contains("Prioritized 3 tasks"));
    assert!(report.validation_summary.contains("Grouped tasks into 3 categories."));
    assert!(report.validation_summary.contains("Inserted 1 breaks."));

    assert_eq!(report.habits.len(), 1);
    assert_eq!(report.habits[0].status, HabitStatus::Active);
    assert_eq!(report.habits[0].importance, 75);
}

#[test]
fn test_report_serializes_wire_names() {
    let request: PlanRequest = serde_json::from_str(REQUEST).unwrap();
    let report = process_plan(request, now(), &Config::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let first = &json["schedule"][0];
    assert_eq!(first["type"], "task");
    assert_eq!(first["quick_actions"][0], "Move earlier");
    assert_eq!(json["schedule"][2]["type"], "break");
    assert_eq!(json["habits"][0]["status"], "active");
}

#[test]
fn test_unplaceable_task_is_reported() {
    let request: PlanRequest = serde_json::from_str(
        r#"{
            "tasks": [{"task_id": "big", "description": "Quarterly audit", "duration_minutes": 600}],
            "calendar_free": []
        }"#,
    )
    .unwrap();
    let report = process_plan(request, now(), &Config::default()).unwrap();
    assert_eq!(report.schedule.len(), 1);
    assert!(report.schedule[0].scheduled_time.is_none());
    assert!(report.validation_summary.contains("1 items could not be placed"));
}

#[test]
fn test_inverted_slot_is_rejected() {
    let request: PlanRequest = serde_json::from_str(
        r#"{
            "tasks": [],
            "calendar_free": [
                {"start_iso": "2026-10-19T12:00:00-07:00", "end_iso": "2026-10-19T09:00:00-07:00"}
            ]
        }"#,
    )
    .unwrap();
    let err = process_plan(request, now(), &Config::default()).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn test_snooze_through_action_request() {
    let request: ActionRequest = serde_json::from_str(
        r#"{
            "tasks": [
                {"task_id": "a", "description": "Draft launch email", "duration_minutes": 30,
                 "scheduled_time": "2026-10-19T10:00:00-07:00"},
                {"task_id": "b", "description": "Send launch email", "duration_minutes": 45,
                 "scheduled_time": "2026-10-19T09:45:00-07:00"}
            ]
        }"#,
    )
    .unwrap();
    assert!(request.find("a").is_some());
    let outcome = snooze_task(&request.tasks, "a", 15);
    assert!(outcome.success);
    let ids: Vec<&str> = outcome
        .schedule_updates
        .iter()
        .map(|u| u.task_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(
        outcome.schedule_updates[1].scheduled_time,
        at("2026-10-19T10:45:00-07:00")
    );
}

#[test]
fn test_quick_tags_batch_request_tasks() {
    let request: ActionRequest = serde_json::from_str(
        r#"{"tasks": [
            {"task_id": "a", "description": "Buy printer paper"},
            {"task_id": "b", "description": "Debug flaky test"}
        ]}"#,
    )
    .unwrap();
    let report = apply_quick_tags(&request.tasks, &[], true).detail.unwrap();
    assert_eq!(report.groups["#errand"], vec!["a"]);
    assert_eq!(report.groups["#coding"], vec!["b"]);
}
