use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::habits::{HabitPlan, HabitStatus};
use crate::scheduler::ScheduleEntry;

const MAX_PROMPT_WORDS: usize = 12;

/// A quick action the planner offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub purpose: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub implementation_difficulty: String,
}

/// An enhancement proposed for later releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSuggestion {
    pub name: String,
    pub justification: String,
}

/// Output of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    #[serde(default)]
    pub features: Vec<Feature>,
    pub schedule: Vec<ScheduleEntry>,
    pub habits: Vec<HabitPlan>,
    #[serde(default)]
    pub feature_suggestions: Vec<FeatureSuggestion>,
    /// One-line nudge toward the next action
    pub cursor_prompt: String,
    pub validation_summary: String,
}

fn feature(name: &str, purpose: &str, kind: &str, difficulty: &str) -> Feature {
    Feature {
        name: name.to_string(),
        purpose: purpose.to_string(),
        kind: kind.to_string(),
        implementation_difficulty: difficulty.to_string(),
    }
}

/// The quick actions, in the order they appear in the UI.
pub fn features() -> Vec<Feature> {
    vec![
        feature(
            "Deep-Block Planner",
            "Creates interruption-free deep work blocks and pauses notifications during \
             them. Placement is justified by priority and morning focus windows.",
            "practical",
            "medium",
        ),
        feature(
            "Smart Deadline Negotiator",
            "Suggests realistic deadline extensions from workload and calendar analysis, \
             with email and snippet templates to request them.",
            "practical",
            "medium",
        ),
        feature(
            "One-Click Snooze",
            "Postpones a scheduled item by 15, 30 or 60 minutes and moves related tasks \
             that would collide with it.",
            "easy",
            "easy",
        ),
        feature(
            "Quick-Tags",
            "Tags tasks instantly (#email, #errand, #urgent) and groups them for batch \
             execution.",
            "easy",
            "easy",
        ),
    ]
}

pub fn feature_suggestions() -> Vec<FeatureSuggestion> {
    [
        (
            "Context-Aware Task Batching",
            "Groups tasks that need similar tools, locations or mental states to cut \
             context switching, for example all email tasks in one block.",
        ),
        (
            "Energy Level Optimization",
            "Learns energy patterns through the day and schedules high-cognitive tasks \
             during peak hours.",
        ),
        (
            "Habit Streak Tracker",
            "Shows habit completion streaks and celebrates milestones to keep habits \
             consistent.",
        ),
    ]
    .into_iter()
    .map(|(name, justification)| FeatureSuggestion {
        name: name.to_string(),
        justification: justification.to_string(),
    })
    .collect()
}

/// Short "Start: ..." prompt for the highest-priority work item, at most
/// twelve words.
pub fn cursor_prompt(schedule: &[ScheduleEntry], tz: Tz) -> String {
    if schedule.is_empty() {
        return "No tasks scheduled. Add tasks to begin.".to_string();
    }
    let Some(top) = schedule
        .iter()
        .filter(|e| !e.is_break())
        .min_by_key(|e| std::cmp::Reverse(e.priority))
    else {
        return "Schedule complete. Take a break!".to_string();
    };

    let at = top
        .scheduled_time
        .map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "soon".to_string());
    let tail = [
        "-".to_string(),
        format!("{}m", top.duration_minutes),
        "at".to_string(),
        at,
    ];

    // "Start:" and the tail always fit; the description gets what is left.
    let budget = MAX_PROMPT_WORDS - 1 - tail.len();
    let description: Vec<&str> = top.description.split_whitespace().take(budget).collect();

    let mut words: Vec<&str> = Vec::with_capacity(MAX_PROMPT_WORDS);
    words.push("Start:");
    words.extend(description.iter().copied());
    words.extend(tail.iter().map(String::as_str));
    words.truncate(MAX_PROMPT_WORDS);
    words.join(" ")
}

/// Plain-language summary of what a run did.
pub fn validation_summary(
    task_count: usize,
    group_count: usize,
    habits: &[HabitPlan],
    schedule: &[ScheduleEntry],
) -> String {
    let active = habits
        .iter()
        .filter(|h| h.status == HabitStatus::Active)
        .count();
    let breaks = schedule.iter().filter(|e| e.is_break()).count();
    let unplaced = schedule
        .iter()
        .filter(|e| e.scheduled_time.is_none())
        .count();

    let mut parts = vec![
        format!("Prioritized {task_count} tasks by deadline, importance and effort."),
        format!("Grouped tasks into {group_count} categories."),
        format!(
            "Processed {} habits: {active} active, {} on back-burner.",
            habits.len(),
            habits.len() - active
        ),
        format!("Inserted {breaks} breaks."),
    ];
    if unplaced > 0 {
        parts.push(format!("{unplaced} items could not be placed in free time."));
    }
    parts.join(" ")
}
