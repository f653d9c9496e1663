//! Task priority scoring for the planning pipeline.
//!
//! Scores are normalized to [0, 1] from:
//! - Deadline proximity (closer = higher, overdue = maximum)
//! - Caller-supplied importance (0-100)
//! - Effort (shorter tasks are favoured as quick wins)
//!
//! Overdue tasks get an extra flat bonus on top of the deadline factor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::grouping::Category;
use super::PlanTask;

/// Weights for each scoring factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Weight for deadline proximity (default 0.5)
    pub deadline_weight: f64,
    /// Weight for normalized importance (default 0.4)
    pub importance_weight: f64,
    /// Penalty weight for effort (default 0.1)
    pub effort_weight: f64,
    /// Flat bonus once the deadline has passed (default 0.3)
    pub overdue_bonus: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            deadline_weight: 0.5,
            importance_weight: 0.4,
            effort_weight: 0.1,
            overdue_bonus: 0.3,
        }
    }
}

/// Coarse urgency bucket derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Urgency::High
        } else if score >= 0.4 {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}

/// A task annotated by the prioritizer and grouper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: PlanTask,
    /// Raw score in [0, 1]
    pub score: f64,
    /// Score scaled to 0-100
    pub priority: u8,
    pub urgency: Urgency,
    /// Visual labels such as "Overdue" or "Quick win"
    pub labels: Vec<String>,
    /// Semantic category assigned by the grouper
    pub category: Category,
}

impl ScoredTask {
    /// Group used for batching: the caller-supplied group, else the category.
    pub fn group_name(&self) -> String {
        self.task
            .group
            .clone()
            .unwrap_or_else(|| self.category.to_string())
    }
}

/// Priority calculator for plan tasks
pub struct Prioritizer {
    weights: PriorityWeights,
    current_time: DateTime<Utc>,
}

impl Prioritizer {
    /// Create a calculator evaluating deadlines against `current_time`
    pub fn new(current_time: DateTime<Utc>) -> Self {
        Self {
            weights: PriorityWeights::default(),
            current_time,
        }
    }

    /// Create with custom weights
    pub fn with_weights(current_time: DateTime<Utc>, weights: PriorityWeights) -> Self {
        Self {
            weights,
            current_time,
        }
    }

    fn hours_until_deadline(&self, task: &PlanTask) -> Option<f64> {
        task.deadline_iso.map(|deadline| {
            let seconds = deadline
                .with_timezone(&Utc)
                .signed_duration_since(self.current_time)
                .num_seconds();
            seconds as f64 / 3600.0
        })
    }

    fn is_overdue(&self, task: &PlanTask) -> bool {
        task.deadline_iso
            .is_some_and(|deadline| self.current_time > deadline.with_timezone(&Utc))
    }

    /// Deadline proximity in [0, 1]: 1.0 when due now or overdue, decaying
    /// by day; 0 without a deadline.
    fn deadline_factor(&self, task: &PlanTask) -> f64 {
        match self.hours_until_deadline(task) {
            None => 0.0,
            Some(hours) if hours <= 0.0 => 1.0,
            Some(hours) => (1.0 / (1.0 + hours / 24.0)).min(1.0),
        }
    }

    fn effort_factor(task: &PlanTask) -> f64 {
        match task.duration_minutes {
            m if m <= 30 => 1.0,
            m if m <= 60 => 0.9,
            m if m <= 120 => 0.8,
            _ => 0.7,
        }
    }

    /// Priority score for a task, clamped to [0, 1].
    pub fn score(&self, task: &PlanTask) -> f64 {
        let importance = (task.importance as f64 / 100.0).clamp(0.0, 1.0);
        let overdue = if self.is_overdue(task) {
            self.weights.overdue_bonus
        } else {
            0.0
        };
        let score = self.deadline_factor(task) * self.weights.deadline_weight
            + importance * self.weights.importance_weight
            - Self::effort_factor(task) * self.weights.effort_weight
            + overdue;
        score.clamp(0.0, 1.0)
    }

    /// Visual labels shown next to a task.
    pub fn labels(&self, task: &PlanTask) -> Vec<String> {
        let mut labels = Vec::new();
        if self.is_overdue(task) {
            labels.push("Overdue".to_string());
        }
        if let Some(hours) = self.hours_until_deadline(task) {
            if (0.0..=24.0).contains(&hours) {
                labels.push("Due today".to_string());
            }
        }
        if task.importance >= 80 {
            labels.push("High importance".to_string());
        }
        if task.duration_minutes <= 30 {
            labels.push("Quick win".to_string());
        }
        labels
    }

    /// Annotate one task. The category stays `General` until the grouper
    /// runs.
    pub fn evaluate(&self, task: PlanTask) -> ScoredTask {
        let score = self.score(&task);
        let labels = self.labels(&task);
        ScoredTask {
            priority: (score * 100.0).round() as u8,
            urgency: Urgency::from_score(score),
            score,
            labels,
            category: Category::General,
            task,
        }
    }

    /// Score every task and sort by score, highest first.
    ///
    /// The sort is stable so equal scores keep input order.
    pub fn prioritize_tasks(&self, tasks: Vec<PlanTask>) -> Vec<ScoredTask> {
        let mut scored: Vec<ScoredTask> = tasks.into_iter().map(|t| self.evaluate(t)).collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        tracing::debug!(count = scored.len(), "prioritized tasks");
        scored
    }
}
