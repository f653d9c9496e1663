//! Quick tags (`#email`, `#errand`, ...) and tag-based batching.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ActionOutcome;
use crate::plan::PlanTask;

const GENERAL_GROUP: &str = "general";

const TAG_KEYWORDS: [(&str, &[&str]); 10] = [
    ("#email", &["email", "mail", "inbox", "reply", "respond"]),
    (
        "#errand",
        &["errand", "pickup", "store", "shop", "buy", "purchase", "grocery"],
    ),
    (
        "#urgent",
        &["urgent", "asap", "immediate", "critical", "emergency"],
    ),
    (
        "#coding",
        &["code", "programming", "debug", "develop", "implement", "function"],
    ),
    ("#meeting", &["meeting", "call", "zoom", "conference", "discuss"]),
    ("#reading", &["read", "review", "study", "learn", "research"]),
    ("#writing", &["write", "draft", "document", "article", "blog"]),
    (
        "#exercise",
        &["exercise", "workout", "gym", "run", "walk", "fitness"],
    ),
    ("#cooking", &["cook", "meal", "dinner", "lunch", "recipe"]),
    ("#cleaning", &["clean", "organize", "tidy", "declutter"]),
];

/// Tags whose keywords appear in `description`, in table order.
pub fn detect_tags(description: &str) -> Vec<String> {
    let description = description.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| description.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagReport {
    pub tagged: Vec<PlanTask>,
    /// Primary tag -> task ids, in first-seen order
    pub groups: IndexMap<String, Vec<String>>,
    /// Every tag present after tagging, sorted
    pub detected_tags: Vec<String>,
}

fn merge_tags(existing: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + extra.len());
    for tag in existing.iter().chain(extra) {
        let tag = tag.trim();
        if !tag.is_empty() && !merged.iter().any(|t| t == tag) {
            merged.push(tag.to_string());
        }
    }
    merged
}

fn group_by_primary_tag(tasks: &[PlanTask]) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for task in tasks {
        let key = task
            .tags
            .first()
            .map_or(GENERAL_GROUP, String::as_str)
            .to_string();
        groups.entry(key).or_default().push(task.task_id.clone());
    }
    groups
}

/// Tag every task with `tags`, or with auto-detected tags when `tags` is
/// empty and `auto_detect` is set, then batch tasks by their first tag.
pub fn apply_quick_tags(tasks: &[PlanTask], tags: &[String], auto_detect: bool) -> ActionOutcome<TagReport> {
    if tasks.is_empty() {
        tracing::warn!("quick tags requested with no tasks");
        return ActionOutcome::declined("No tasks provided.", "Cannot tag an empty task list.");
    }
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() && !auto_detect {
        return ActionOutcome::declined(
            "No tags provided and auto-detect is disabled.",
            "Cannot apply tags without tags or auto-detection.",
        );
    }

    let tagged: Vec<PlanTask> = tasks
        .iter()
        .map(|task| {
            let extra = if tags.is_empty() {
                detect_tags(&task.description)
            } else {
                tags.clone()
            };
            PlanTask {
                tags: merge_tags(&task.tags, &extra),
                ..task.clone()
            }
        })
        .collect();
    let groups = group_by_primary_tag(&tagged);
    let detected_tags: Vec<String> = tagged
        .iter()
        .flat_map(|t| t.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    tracing::info!(tasks = tagged.len(), groups = groups.len(), "quick tags applied");
    let (message, reasoning) = if tags.is_empty() {
        (
            format!("Auto-detected and applied {} tag(s) to tasks.", detected_tags.len()),
            format!(
                "Auto-detected tags [{}] from task descriptions. Created {} tag-based groups for \
                 batch execution.",
                detected_tags.join(", "),
                groups.len()
            ),
        )
    } else {
        (
            format!("Applied tags [{}] to {} task(s).", tags.join(", "), tagged.len()),
            format!(
                "Tagged {} tasks with [{}]. Created {} tag-based groups for batch execution.",
                tagged.len(),
                tags.join(", "),
                groups.len()
            ),
        )
    };

    ActionOutcome::done(
        message,
        reasoning,
        TagReport {
            tagged,
            groups,
            detected_tags,
        },
        Vec::new(),
    )
}
