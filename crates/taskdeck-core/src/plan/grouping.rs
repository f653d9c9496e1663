//! Keyword-based task categories used to batch similar work together.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use super::priority::ScoredTask;

/// Semantic category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
    Emails,
    Errands,
    Coding,
    Study,
    Meetings,
    Writing,
    Planning,
    #[default]
    General,
}

impl Category {
    /// Categories with keyword patterns, in tie-break order.
    pub const MATCHED: [Category; 7] = [
        Category::Emails,
        Category::Errands,
        Category::Coding,
        Category::Study,
        Category::Meetings,
        Category::Writing,
        Category::Planning,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Emails => "Emails",
            Category::Errands => "Errands",
            Category::Coding => "Coding",
            Category::Study => "Study",
            Category::Meetings => "Meetings",
            Category::Writing => "Writing",
            Category::Planning => "Planning",
            Category::General => "General",
        }
    }

    fn patterns(self) -> &'static [&'static str] {
        match self {
            Category::Emails => &[
                r"\b(email|reply|respond|inbox|message|correspondence)\b",
                r"\b(send|read|check|review.*email)\b",
            ],
            Category::Errands => &[
                r"\b(errand|grocery|shopping|store|pickup|delivery|post office|bank)\b",
                r"\b(buy|purchase|get|fetch|collect)\b",
            ],
            Category::Coding => &[
                r"\b(code|programming|develop|debug|fix|implement|refactor|test|git|commit)\b",
                r"\b(function|class|api|endpoint|database|sql|python|javascript|typescript)\b",
            ],
            Category::Study => &[
                r"\b(study|learn|read|research|review|notes|homework|assignment|exam|test)\b",
                r"\b(chapter|book|article|course|lecture|practice)\b",
            ],
            Category::Meetings => &[
                r"\b(meeting|call|conference|discussion|standup|sync|presentation|demo)\b",
                r"\b(zoom|teams|video|phone|interview)\b",
            ],
            Category::Writing => &[
                r"\b(write|draft|edit|document|report|blog|article|essay|proposal)\b",
                r"\b(content|copy|manuscript|script)\b",
            ],
            Category::Planning => &[
                r"\b(plan|organize|schedule|prepare|outline|strategy|roadmap)\b",
                r"\b(design|architecture|structure|framework)\b",
            ],
            Category::General => &[],
        }
    }

    /// Category with the most keyword hits in `description`.
    ///
    /// Ties resolve to the earlier category in [`Category::MATCHED`];
    /// no hits at all yields [`Category::General`].
    pub fn classify(description: &str) -> Category {
        let text = description.to_lowercase();
        let mut best = (Category::General, 0usize);
        for (category, patterns) in COMPILED.iter() {
            let hits: usize = patterns.iter().map(|re| re.find_iter(&text).count()).sum();
            if hits > best.1 {
                best = (*category, hits);
            }
        }
        best.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static COMPILED: LazyLock<Vec<(Category, Vec<Regex>)>> = LazyLock::new(|| {
    Category::MATCHED
        .iter()
        .map(|category| {
            let regexes = category
                .patterns()
                .iter()
                .filter_map(|pattern| match Regex::new(pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::error!(%category, error = %e, "invalid category pattern");
                        None
                    }
                })
                .collect();
            (*category, regexes)
        })
        .collect()
});

/// Assign a category to every task from its description.
pub fn group_tasks(tasks: &mut [ScoredTask]) {
    for task in tasks.iter_mut() {
        task.category = Category::classify(&task.task.description);
    }
}

/// Split tasks into batches sharing a group, ordered by group name.
///
/// Order within a batch follows the input order.
pub fn batch_similar_tasks(tasks: Vec<ScoredTask>) -> Vec<Vec<ScoredTask>> {
    let mut batches: BTreeMap<String, Vec<ScoredTask>> = BTreeMap::new();
    for task in tasks {
        batches.entry(task.group_name()).or_default().push(task);
    }
    batches.into_values().collect()
}

/// Number of distinct groups among `tasks`.
pub fn count_groups(tasks: &[ScoredTask]) -> usize {
    tasks
        .iter()
        .map(ScoredTask::group_name)
        .collect::<std::collections::BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::priority::Prioritizer;
    use crate::plan::PlanTask;
    use chrono::Utc;

    fn scored(id: &str, description: &str) -> ScoredTask {
        let mut task = Prioritizer::new(Utc::now()).evaluate(PlanTask {
            task_id: id.to_string(),
            description: description.to_string(),
            ..PlanTask::default()
        });
        group_tasks(std::slice::from_mut(&mut task));
        task
    }

    #[test]
    fn all_patterns_compile() {
        for (category, regexes) in COMPILED.iter() {
            assert_eq!(regexes.len(), category.patterns().len(), "{category}");
        }
    }

    #[test]
    fn classifies_by_keywords() {
        assert_eq!(Category::classify("Reply to inbox messages"), Category::Emails);
        assert_eq!(Category::classify("Buy groceries at the store"), Category::Errands);
        assert_eq!(Category::classify("Debug the API endpoint"), Category::Coding);
        assert_eq!(Category::classify("Team standup on Zoom"), Category::Meetings);
        assert_eq!(Category::classify("Draft blog essay"), Category::Writing);
        assert_eq!(Category::classify("Outline Q3 roadmap"), Category::Planning);
        assert_eq!(Category::classify("Water the plants"), Category::General);
    }

    #[test]
    fn ties_use_declaration_order() {
        // "test" hits Coding and Study once each.
        assert_eq!(Category::classify("test"), Category::Coding);
    }

    #[test]
    fn batches_sorted_by_group_name() {
        let tasks = vec![
            scored("1", "Write report"),
            scored("2", "Reply to email"),
            scored("3", "Draft proposal"),
            scored("4", "Walk the dog"),
        ];
        assert_eq!(count_groups(&tasks), 3);
        let batches = batch_similar_tasks(tasks);
        let names: Vec<_> = batches.iter().map(|b| b[0].group_name()).collect();
        assert_eq!(names, vec!["Emails", "General", "Writing"]);
        let writing: Vec<_> = batches[2].iter().map(|t| t.task.task_id.as_str()).collect();
        assert_eq!(writing, vec!["1", "3"]);
    }

    #[test]
    fn explicit_group_overrides_category() {
        let mut task = scored("1", "Write report");
        task.task.group = Some("Client".to_string());
        assert_eq!(task.group_name(), "Client");
        group_tasks(std::slice::from_mut(&mut task));
        assert_eq!(task.category, Category::Writing);
    }
}
