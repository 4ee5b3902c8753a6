//! Storage contracts and implementations.
//!
//! Services are constructed with injected store handles; there is no
//! process-wide shared state.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{DbReviewProgress, DbWord, DbWordStats};
use srs_core::Level;

/// Fields for a progress row to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewReviewProgress {
    pub user_id: i64,
    pub word_id: i64,
    pub easiness_factor: f64,
    pub next_review_time: DateTime<Utc>,
}

/// Fields for a stats row to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewWordStats {
    pub user_id: i64,
    pub word_id: i64,
    pub priority_score: f64,
}

/// Durable per-user scheduling state.
///
/// Implementations must apply each call atomically at row granularity.
/// Storage failures propagate unmodified.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn progress_for_user(&self, user_id: i64) -> Result<Vec<DbReviewProgress>>;

    async fn find_progress(&self, progress_id: i64) -> Result<Option<DbReviewProgress>>;

    async fn find_progress_by_word(
        &self,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<DbReviewProgress>>;

    /// Due rows (`next_review_time <= now`) ordered most-overdue first,
    /// capped at `limit`.
    async fn due_progress(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DbReviewProgress>>;

    async fn insert_progress(&self, new: NewReviewProgress) -> Result<DbReviewProgress>;

    async fn update_progress(&self, progress: &DbReviewProgress) -> Result<()>;

    async fn delete_progress(&self, progress_id: i64) -> Result<()>;

    async fn stats_for_user(&self, user_id: i64) -> Result<Vec<DbWordStats>>;

    async fn find_stats(&self, stats_id: i64) -> Result<Option<DbWordStats>>;

    async fn stats_for_words(&self, user_id: i64, word_ids: &[i64]) -> Result<Vec<DbWordStats>>;

    async fn insert_stats(&self, new: NewWordStats) -> Result<DbWordStats>;

    async fn update_stats(&self, stats: &DbWordStats) -> Result<()>;

    async fn update_stats_priority(&self, stats_id: i64, priority: f64) -> Result<()>;

    async fn delete_stats(&self, stats_id: i64) -> Result<()>;
}

/// Read-only vocabulary lookup.
#[async_trait]
pub trait VocabularyCatalog: Send + Sync {
    /// Words in the allowlisted levels minus `exclude`, ordered by id
    /// ascending. The ordering is the deterministic tie-break for selection.
    async fn words_by_levels(&self, levels: &[Level], exclude: &[i64]) -> Result<Vec<DbWord>>;

    async fn word(&self, word_id: i64) -> Result<Option<DbWord>>;
}
