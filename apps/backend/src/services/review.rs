//! SM-2 review scheduling service.
//!
//! Due-set selection, answer application and aggregate reporting for words
//! under full spaced-repetition scheduling.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::DbReviewProgress;
use crate::store::{NewReviewProgress, ProgressStore};
use srs_core::{stage, Quality, ReviewStats, Sm2};

/// Words with stage 4+ count as mastered in review reporting.
const MASTERED_STAGE: i16 = 4;

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn ProgressStore>,
    sm2: Sm2,
    max_per_session: usize,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ProgressStore>, sm2: Sm2, max_per_session: usize) -> Self {
        Self {
            store,
            sm2,
            max_per_session,
        }
    }

    /// Words due for review, most overdue first. Empty is a normal outcome.
    pub async fn due_words(
        &self,
        user_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<DbReviewProgress>> {
        let limit = limit.unwrap_or(self.max_per_session);
        self.store.due_progress(user_id, Utc::now(), limit).await
    }

    /// Apply a graded answer and persist the recomputed schedule.
    ///
    /// An unknown id is ignored: the caller's view of the due set may be
    /// stale. Returns the updated row, or None on the no-op path.
    pub async fn apply_answer(
        &self,
        progress_id: i64,
        quality: Quality,
        is_correct: bool,
    ) -> Result<Option<DbReviewProgress>> {
        let Some(mut progress) = self.store.find_progress(progress_id).await? else {
            tracing::debug!(progress_id, "answer for unknown progress row ignored");
            return Ok(None);
        };

        let now = Utc::now();
        let result = self.sm2.schedule(&progress.review_state(), quality, now);

        progress.last_quality = quality.to_value() as i16;
        progress.repetitions = result.state.repetitions as i32;
        progress.easiness_factor = result.state.easiness_factor;
        progress.interval_days = result.state.interval_days as i32;
        progress.next_review_time = result.next_due;
        progress.last_reviewed = Some(now);
        progress.times_reviewed += 1;
        if is_correct {
            progress.times_correct += 1;
        } else {
            progress.times_wrong += 1;
        }
        progress.stage = stage(result.state.repetitions) as i16;

        self.store.update_progress(&progress).await?;
        Ok(Some(progress))
    }

    /// Start tracking a word for a user, due immediately.
    ///
    /// Idempotent: returns None if a progress row already exists.
    pub async fn add_word_to_user(
        &self,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<DbReviewProgress>> {
        if self
            .store
            .find_progress_by_word(user_id, word_id)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let progress = self
            .store
            .insert_progress(NewReviewProgress {
                user_id,
                word_id,
                easiness_factor: self.sm2.initial_ease,
                next_review_time: Utc::now(),
            })
            .await?;

        Ok(Some(progress))
    }

    /// Aggregate review counts for a user.
    pub async fn review_stats(&self, user_id: i64) -> Result<ReviewStats> {
        let all = self.store.progress_for_user(user_id).await?;
        let now = Utc::now();

        Ok(ReviewStats {
            total: all.len(),
            due_now: all.iter().filter(|p| p.next_review_time <= now).count(),
            mastered: all.iter().filter(|p| p.stage >= MASTERED_STAGE).count(),
            learning: all
                .iter()
                .filter(|p| p.stage > 0 && p.stage < MASTERED_STAGE)
                .count(),
            new: all.iter().filter(|p| p.stage == 0).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> ReviewService {
        ReviewService::new(store, Sm2::default(), 10)
    }

    #[tokio::test]
    async fn add_word_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let first = svc.add_word_to_user(1, 42).await.unwrap();
        let second = svc.add_word_to_user(1, 42).await.unwrap();

        let progress = first.expect("first add creates a row");
        assert_eq!(progress.interval_days, 0);
        assert_eq!(progress.stage, 0);
        assert!((progress.easiness_factor - 2.5).abs() < 1e-9);
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn fresh_word_answered_perfectly_twice() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let progress = svc.add_word_to_user(1, 42).await.unwrap().unwrap();

        let first = svc
            .apply_answer(progress.id, Quality::Perfect, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.interval_days, 1);
        assert_eq!(first.repetitions, 1);
        assert!(first.easiness_factor >= 2.5);
        assert_eq!(first.times_correct, 1);
        assert_eq!(first.stage, 1);

        let second = svc
            .apply_answer(progress.id, Quality::Perfect, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.interval_days, 6);
        assert_eq!(second.repetitions, 2);
        assert_eq!(second.times_reviewed, 2);
    }

    #[tokio::test]
    async fn lapse_resets_schedule_and_counts_wrong() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let progress = svc.add_word_to_user(1, 42).await.unwrap().unwrap();
        svc.apply_answer(progress.id, Quality::Perfect, true)
            .await
            .unwrap();

        let lapsed = svc
            .apply_answer(progress.id, Quality::Blackout, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lapsed.repetitions, 0);
        assert_eq!(lapsed.interval_days, 0);
        assert_eq!(lapsed.stage, 0);
        assert_eq!(lapsed.times_wrong, 1);
    }

    #[tokio::test]
    async fn unknown_progress_id_is_a_silent_noop() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());

        let tracked = svc.add_word_to_user(1, 42).await.unwrap().unwrap();

        let result = svc.apply_answer(9999, Quality::Perfect, true).await.unwrap();
        assert!(result.is_none());

        // Nothing else was touched.
        let unchanged = store.find_progress(tracked.id).await.unwrap().unwrap();
        assert_eq!(unchanged.times_reviewed, 0);
        assert_eq!(unchanged.repetitions, 0);
    }

    #[tokio::test]
    async fn due_words_caps_at_session_limit_most_overdue_first() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let now = Utc::now();

        // 12 due rows, each one day more overdue than the last.
        for word_id in 1..=12 {
            let mut progress = svc.add_word_to_user(1, word_id).await.unwrap().unwrap();
            progress.next_review_time = now - Duration::days(word_id);
            store.update_progress(&progress).await.unwrap();
        }

        let due = svc.due_words(1, None).await.unwrap();
        assert_eq!(due.len(), 10);
        // Most overdue first: word 12 was pushed back furthest.
        assert_eq!(due[0].word_id, 12);
        assert_eq!(due[9].word_id, 3);
    }

    #[tokio::test]
    async fn due_words_never_returns_future_rows() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let now = Utc::now();

        let mut future = svc.add_word_to_user(1, 1).await.unwrap().unwrap();
        future.next_review_time = now + Duration::days(3);
        store.update_progress(&future).await.unwrap();

        svc.add_word_to_user(1, 2).await.unwrap();

        let due = svc.due_words(1, None).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].word_id, 2);
    }

    #[tokio::test]
    async fn empty_due_set_is_normal() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store);

        let due = svc.due_words(7, None).await.unwrap();
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn review_stats_buckets_by_stage() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let now = Utc::now();

        // One new, one learning, one mastered; the mastered one not yet due.
        svc.add_word_to_user(1, 1).await.unwrap();

        let mut learning = svc.add_word_to_user(1, 2).await.unwrap().unwrap();
        learning.stage = 2;
        learning.repetitions = 2;
        store.update_progress(&learning).await.unwrap();

        let mut mastered = svc.add_word_to_user(1, 3).await.unwrap().unwrap();
        mastered.stage = 5;
        mastered.repetitions = 7;
        mastered.next_review_time = now + Duration::days(30);
        store.update_progress(&mastered).await.unwrap();

        let stats = svc.review_stats(1).await.unwrap();
        assert_eq!(
            stats,
            ReviewStats {
                total: 3,
                due_now: 2,
                mastered: 1,
                learning: 1,
                new: 1,
            }
        );
    }
}
