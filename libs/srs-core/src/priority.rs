//! Urgency formulas for first-pass flashcard selection.
//!
//! Two distinct curves share the same counters but encode different tuning:
//! the selection-time formula favors recency, the feedback-time formula
//! escalates on error rate. They stay separate named functions.

use chrono::{DateTime, Utc};

/// Priority assigned to a word the user has never seen.
pub const NEW_WORD_PRIORITY: f64 = 100.0;

const BASE_PRIORITY: f64 = 10.0;
const DONT_KNOW_WEIGHT: f64 = 3.0;
const KNOW_WEIGHT: f64 = 1.0;
const RECENCY_WEIGHT: f64 = 2.0;

const FEEDBACK_BASE: f64 = 100.0;
const MISTAKE_BONUS_SCALE: f64 = 20.0;
const KNOWLEDGE_PENALTY_SCALE: f64 = 8.0;
const MASTERY_PENALTY: f64 = 50.0;
const MIN_FEEDBACK_PRIORITY: f64 = 1.0;

const MASTERY_THRESHOLD: u32 = 3;

/// Selection-time urgency, floored at 0.0.
pub fn selection_priority(know_count: u32, dont_know_count: u32, days_since_shown: i64) -> f64 {
    let priority = dont_know_count as f64 * DONT_KNOW_WEIGHT - know_count as f64 * KNOW_WEIGHT
        + days_since_shown as f64 * RECENCY_WEIGHT
        + BASE_PRIORITY;
    priority.max(0.0)
}

/// Feedback-time urgency, floored at 1.0 so every word stays selectable.
///
/// Mistakes raise priority superlinearly; mastered words take a flat
/// additional penalty.
pub fn feedback_priority(know_count: u32, dont_know_count: u32) -> f64 {
    let mistake_bonus = (dont_know_count as f64).powf(1.5) * MISTAKE_BONUS_SCALE;
    let mut knowledge_penalty = (know_count as f64).powf(0.8) * KNOWLEDGE_PENALTY_SCALE;

    if is_mastered(know_count, dont_know_count) {
        knowledge_penalty += MASTERY_PENALTY;
    }

    (FEEDBACK_BASE + mistake_bonus - knowledge_penalty).max(MIN_FEEDBACK_PRIORITY)
}

/// A word is mastered after three correct feedbacks and no incorrect ones.
/// One later incorrect feedback revokes mastery immediately.
pub fn is_mastered(know_count: u32, dont_know_count: u32) -> bool {
    know_count >= MASTERY_THRESHOLD && dont_know_count == 0
}

/// Whole days since the word was last shown; 0 when never shown or shown
/// today.
pub fn days_since_shown(last_shown: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match last_shown {
        Some(shown) => (now - shown).num_days().max(0),
        None => 0,
    }
}
