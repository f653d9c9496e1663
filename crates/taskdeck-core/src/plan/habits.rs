//! Habit management: sentiment, motivation and active / back-burner status.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scheduler::FreeSlot;
use crate::storage::HabitConfig;
use crate::time::local_datetime;

fn default_habit_minutes() -> i64 {
    20
}

/// A habit as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitInput {
    pub habit_id: String,
    pub name: String,
    #[serde(default)]
    pub importance_statement: String,
    #[serde(default = "default_habit_minutes")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub end_goal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Result of analyzing an importance statement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    /// 0-100
    pub importance: u8,
    pub confidence: f32,
}

/// Source of sentiment readings for habit statements.
pub trait SentimentAnalyzer {
    /// Analyzer name for logs.
    fn name(&self) -> &str;

    fn analyze(&self, statement: &str) -> SentimentReading;
}

const POSITIVE_WORDS: [&str; 12] = [
    "important", "crucial", "essential", "vital", "help", "improve", "benefit", "achieve", "goal",
    "success", "progress", "growth",
];

const NEGATIVE_WORDS: [&str; 10] = [
    "stress", "worry", "anxiety", "difficult", "hard", "struggle", "problem", "issue", "concern",
    "fear",
];

const IMPORTANCE_WORDS: [&str; 6] = [
    "important",
    "critical",
    "crucial",
    "essential",
    "priority",
    "vital",
];

/// Local keyword heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSentiment;

impl SentimentAnalyzer for KeywordSentiment {
    fn name(&self) -> &str {
        "keyword"
    }

    fn analyze(&self, statement: &str) -> SentimentReading {
        let text = statement.to_lowercase();
        let count = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count();
        let positive = count(&POSITIVE_WORDS);
        let negative = count(&NEGATIVE_WORDS);

        let sentiment = match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        };
        // Negative statements often signal urgency.
        let importance = if count(&IMPORTANCE_WORDS) > 0 {
            75
        } else {
            match sentiment {
                Sentiment::Positive => 60,
                Sentiment::Negative => 70,
                Sentiment::Neutral => 50,
            }
        };
        SentimentReading {
            sentiment,
            importance,
            confidence: 0.5,
        }
    }
}

/// A book cited in motivational messages.
struct Citation {
    author: &'static str,
    title: &'static str,
    publisher: &'static str,
    year: u16,
}

impl Citation {
    /// MLA works-cited entry.
    fn mla(&self) -> String {
        format!("{}. {}. {}, {}.", self.author, self.title, self.publisher, self.year)
    }
}

const ATOMIC_HABITS: Citation = Citation {
    author: "Clear, James",
    title: "Atomic Habits: An Easy & Proven Way to Build Good Habits & Break Bad Ones",
    publisher: "Avery",
    year: 2018,
};

const POWER_OF_HABIT: Citation = Citation {
    author: "Duhigg, Charles",
    title: "The Power of Habit: Why We Do What We Do in Life and Business",
    publisher: "Random House",
    year: 2012,
};

const SEVEN_HABITS: Citation = Citation {
    author: "Covey, Stephen R.",
    title: "The 7 Habits of Highly Effective People: Powerful Lessons in Personal Change",
    publisher: "Free Press",
    year: 1989,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motivation {
    pub message: String,
    pub citations: Vec<String>,
}

/// Encouragement for a habit, with one MLA citation.
pub fn motivational_message(habit: &HabitInput, sentiment: Sentiment, importance: u8) -> Motivation {
    let name = if habit.name.trim().is_empty() {
        "this habit"
    } else {
        habit.name.as_str()
    };
    let goal = if habit.end_goal.trim().is_empty() {
        "your goals"
    } else {
        habit.end_goal.as_str()
    };

    let citation = if importance >= 80 {
        &ATOMIC_HABITS
    } else if sentiment == Sentiment::Positive {
        &POWER_OF_HABIT
    } else {
        &SEVEN_HABITS
    };

    let message = match (sentiment, importance >= 70) {
        (Sentiment::Positive, true) => format!(
            "You're building something meaningful with {name}! Every small step brings you \
             closer to {goal}. Remember: \"Small changes can make a remarkable difference\" \
             (Clear 23). Keep going!"
        ),
        (Sentiment::Positive, false) => format!(
            "{name} is a positive step toward {goal}. Consistency is key: \"You do not rise to \
             the level of your goals. You fall to the level of your systems\" (Clear 27)."
        ),
        (_, true) => format!(
            "{name} matters for achieving {goal}. Even when it's challenging, remember: \"The \
             secret of getting ahead is getting started\" (Covey 45). You've got this!"
        ),
        (_, false) => format!(
            "Building {name} will help you reach {goal}. Start small and stay consistent. \
             Every habit starts with a single step."
        ),
    };

    Motivation {
        message,
        citations: vec![citation.mla()],
    }
}

/// Earliest free slot starting at or after today's notification hour,
/// else today at that hour.
pub fn notification_time(
    free: &[FreeSlot],
    now: DateTime<Utc>,
    tz: Tz,
    config: &HabitConfig,
) -> DateTime<FixedOffset> {
    let today = now.with_timezone(&tz).date_naive();
    let default = local_datetime(&tz, today, config.notification_hour, 0).fixed_offset();
    free.iter()
        .map(|s| s.start)
        .filter(|start| *start >= default)
        .min()
        .map(|start| start.with_timezone(&tz).fixed_offset())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStatus {
    Active,
    BackBurner,
}

/// A habit after analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPlan {
    pub habit_id: String,
    pub name: String,
    pub importance: u8,
    pub sentiment: Sentiment,
    pub status: HabitStatus,
    pub motivation: Motivation,
    pub notification_time: DateTime<FixedOffset>,
    pub accountability_prompted: bool,
    pub duration_minutes: i64,
    pub end_goal: String,
}

/// Analyze habits and keep at most `max_active` of them active, by
/// importance. Equal importance keeps input order.
pub fn process_habits(
    habits: &[HabitInput],
    free: &[FreeSlot],
    now: DateTime<Utc>,
    tz: Tz,
    config: &HabitConfig,
    analyzer: &dyn SentimentAnalyzer,
) -> Vec<HabitPlan> {
    let notify_at = notification_time(free, now, tz, config);
    let mut plans: Vec<HabitPlan> = habits
        .iter()
        .map(|habit| {
            let reading = analyzer.analyze(&habit.importance_statement);
            HabitPlan {
                habit_id: habit.habit_id.clone(),
                name: habit.name.clone(),
                importance: reading.importance,
                sentiment: reading.sentiment,
                status: HabitStatus::BackBurner,
                motivation: motivational_message(habit, reading.sentiment, reading.importance),
                notification_time: notify_at,
                accountability_prompted: false,
                duration_minutes: habit.duration_minutes,
                end_goal: habit.end_goal.clone(),
            }
        })
        .collect();

    plans.sort_by(|a, b| b.importance.cmp(&a.importance));
    for (i, plan) in plans.iter_mut().enumerate() {
        if i < config.max_active {
            plan.status = HabitStatus::Active;
        }
    }
    tracing::debug!(
        analyzer = analyzer.name(),
        habits = plans.len(),
        "processed habits"
    );
    plans
}
