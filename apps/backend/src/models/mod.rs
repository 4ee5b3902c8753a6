//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use srs_core::ReviewState;

// Re-export shared types from srs-core
pub use srs_core::{LearningStats, Level, Quality, ReviewStats};

// === Database Entity Types ===

/// Vocabulary entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWord {
    pub id: i64,
    pub word: String,
    pub translation: String,
    pub example_sentence: Option<String>,
    pub level: String,
    pub category: Option<String>,
}

/// Per-user SM-2 schedule state for one word
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewProgress {
    pub id: i64,
    pub user_id: i64,
    pub word_id: i64,
    pub stage: i16,
    pub next_review_time: DateTime<Utc>,
    pub last_quality: i16,
    pub repetitions: i32,
    pub easiness_factor: f64,
    pub interval_days: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub times_reviewed: i32,
    pub times_correct: i32,
    pub times_wrong: i32,
}

impl DbReviewProgress {
    /// Extract the pure scheduling state for the SM-2 scheduler.
    pub fn review_state(&self) -> ReviewState {
        ReviewState {
            repetitions: self.repetitions.max(0) as u32,
            easiness_factor: self.easiness_factor,
            interval_days: self.interval_days.max(0) as u32,
        }
    }
}

/// Per-user flashcard exposure stats for one word
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWordStats {
    pub id: i64,
    pub user_id: i64,
    pub word_id: i64,
    pub know_count: i32,
    pub dont_know_count: i32,
    pub last_shown: Option<DateTime<Utc>>,
    pub priority_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// === API Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct AddWordRequest {
    pub user_id: i64,
    pub word_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DueQuery {
    pub user_id: i64,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub progress_id: i64,
    /// Recall quality grade, 0-5.
    pub quality: u8,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    /// False when the progress row no longer exists (stale caller view).
    pub applied: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NextWordQuery {
    pub user_id: i64,
    /// Comma-separated word ids to skip, e.g. words already in the session.
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextWordResponse {
    pub word: DbWord,
    pub stats: DbWordStats,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub stats_id: i64,
    pub knows_word: bool,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub applied: bool,
}
