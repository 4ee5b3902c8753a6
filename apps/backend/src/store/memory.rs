//! In-memory store implementation.
//!
//! Backs the test suites and database-free local runs. Behavior mirrors the
//! PostgreSQL store: id assignment, id-ascending catalog order, row-level
//! last-write-wins updates.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{DbReviewProgress, DbWord, DbWordStats};
use crate::store::{NewReviewProgress, NewWordStats, ProgressStore, VocabularyCatalog};
use srs_core::Level;

#[derive(Default)]
struct Inner {
    words: BTreeMap<i64, DbWord>,
    progress: HashMap<i64, DbReviewProgress>,
    stats: HashMap<i64, DbWordStats>,
    next_progress_id: i64,
    next_stats_id: i64,
}

/// Store keeping everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a vocabulary entry. Overwrites an existing word with the same id.
    pub async fn insert_word(&self, word: DbWord) {
        let mut inner = self.inner.write().await;
        inner.words.insert(word.id, word);
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn progress_for_user(&self, user_id: i64) -> Result<Vec<DbReviewProgress>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }

    async fn find_progress(&self, progress_id: i64) -> Result<Option<DbReviewProgress>> {
        let inner = self.inner.read().await;
        Ok(inner.progress.get(&progress_id).cloned())
    }

    async fn find_progress_by_word(
        &self,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<DbReviewProgress>> {
        let inner = self.inner.read().await;
        Ok(inner
            .progress
            .values()
            .find(|p| p.user_id == user_id && p.word_id == word_id)
            .cloned())
    }

    async fn due_progress(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DbReviewProgress>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .progress
            .values()
            .filter(|p| p.user_id == user_id && p.next_review_time <= now)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.next_review_time);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn insert_progress(&self, new: NewReviewProgress) -> Result<DbReviewProgress> {
        let mut inner = self.inner.write().await;
        inner.next_progress_id += 1;
        let progress = DbReviewProgress {
            id: inner.next_progress_id,
            user_id: new.user_id,
            word_id: new.word_id,
            stage: 0,
            next_review_time: new.next_review_time,
            last_quality: 0,
            repetitions: 0,
            easiness_factor: new.easiness_factor,
            interval_days: 0,
            last_reviewed: None,
            times_reviewed: 0,
            times_correct: 0,
            times_wrong: 0,
        };
        inner.progress.insert(progress.id, progress.clone());
        Ok(progress)
    }

    async fn update_progress(&self, progress: &DbReviewProgress) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.progress.get_mut(&progress.id) {
            *existing = progress.clone();
        }
        Ok(())
    }

    async fn delete_progress(&self, progress_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.progress.remove(&progress_id);
        Ok(())
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<Vec<DbWordStats>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .stats
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    async fn find_stats(&self, stats_id: i64) -> Result<Option<DbWordStats>> {
        let inner = self.inner.read().await;
        Ok(inner.stats.get(&stats_id).cloned())
    }

    async fn stats_for_words(&self, user_id: i64, word_ids: &[i64]) -> Result<Vec<DbWordStats>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<_> = inner
            .stats
            .values()
            .filter(|s| s.user_id == user_id && word_ids.contains(&s.word_id))
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    async fn insert_stats(&self, new: NewWordStats) -> Result<DbWordStats> {
        let mut inner = self.inner.write().await;
        inner.next_stats_id += 1;
        let now = Utc::now();
        let stats = DbWordStats {
            id: inner.next_stats_id,
            user_id: new.user_id,
            word_id: new.word_id,
            know_count: 0,
            dont_know_count: 0,
            last_shown: None,
            priority_score: new.priority_score,
            created_at: now,
            updated_at: now,
        };
        inner.stats.insert(stats.id, stats.clone());
        Ok(stats)
    }

    async fn update_stats(&self, stats: &DbWordStats) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.stats.get_mut(&stats.id) {
            *existing = stats.clone();
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_stats_priority(&self, stats_id: i64, priority: f64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.stats.get_mut(&stats_id) {
            existing.priority_score = priority;
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_stats(&self, stats_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.stats.remove(&stats_id);
        Ok(())
    }
}

#[async_trait]
impl VocabularyCatalog for MemoryStore {
    async fn words_by_levels(&self, levels: &[Level], exclude: &[i64]) -> Result<Vec<DbWord>> {
        let inner = self.inner.read().await;
        // BTreeMap iteration gives id-ascending order.
        Ok(inner
            .words
            .values()
            .filter(|w| levels.iter().any(|l| l.as_str() == w.level))
            .filter(|w| !exclude.contains(&w.id))
            .cloned()
            .collect())
    }

    async fn word(&self, word_id: i64) -> Result<Option<DbWord>> {
        let inner = self.inner.read().await;
        Ok(inner.words.get(&word_id).cloned())
    }
}
