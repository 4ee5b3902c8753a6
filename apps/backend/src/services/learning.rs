//! Priority-ranked first-pass learning service.
//!
//! Words the user has not graduated into full SM-2 scheduling are shown
//! flashcard-style, ordered by an urgency score over explicit know /
//! don't-know feedback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{DbWord, DbWordStats};
use crate::store::{NewWordStats, ProgressStore, VocabularyCatalog};
use srs_core::priority::{
    days_since_shown, feedback_priority, is_mastered, selection_priority, NEW_WORD_PRIORITY,
};
use srs_core::{LearningStats, Level};

#[derive(Clone)]
pub struct LearningService {
    store: Arc<dyn ProgressStore>,
    catalog: Arc<dyn VocabularyCatalog>,
    levels: Vec<Level>,
}

impl LearningService {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        catalog: Arc<dyn VocabularyCatalog>,
        levels: Vec<Level>,
    ) -> Self {
        Self {
            store,
            catalog,
            levels,
        }
    }

    /// Pick the most urgent word for the user, or None if the pool is empty.
    ///
    /// Never-seen words score `NEW_WORD_PRIORITY`; tracked words score by the
    /// selection formula. Ties go to the lowest word id. Before returning,
    /// the winner gets a stats row materialized if it never had one, and
    /// recomputed priorities for already-tracked candidates are written back.
    pub async fn next_word(
        &self,
        user_id: i64,
        exclude: &[i64],
    ) -> Result<Option<(DbWord, DbWordStats)>> {
        let words = self.catalog.words_by_levels(&self.levels, exclude).await?;
        if words.is_empty() {
            return Ok(None);
        }

        let word_ids: Vec<i64> = words.iter().map(|w| w.id).collect();
        let mut stats_map: HashMap<i64, DbWordStats> = self
            .store
            .stats_for_words(user_id, &word_ids)
            .await?
            .into_iter()
            .map(|s| (s.word_id, s))
            .collect();

        let now = Utc::now();
        let mut best: Option<(usize, f64)> = None;
        let mut updates: Vec<(i64, f64)> = Vec::new();

        // Candidates arrive in word-id order, so the strict comparison makes
        // the lowest id win ties.
        for (index, word) in words.iter().enumerate() {
            let priority = match stats_map.get(&word.id) {
                Some(stats) => {
                    let priority = selection_priority(
                        stats.know_count.max(0) as u32,
                        stats.dont_know_count.max(0) as u32,
                        days_since_shown(stats.last_shown, now),
                    );
                    if (priority - stats.priority_score).abs() > f64::EPSILON {
                        updates.push((stats.id, priority));
                    }
                    priority
                }
                None => NEW_WORD_PRIORITY,
            };

            if best.map_or(true, |(_, top)| priority > top) {
                best = Some((index, priority));
            }
        }

        let Some((index, priority)) = best else {
            return Ok(None);
        };
        let word = words[index].clone();

        let stats = match stats_map.remove(&word.id) {
            Some(mut stats) => {
                stats.priority_score = priority;
                stats
            }
            None => {
                self.store
                    .insert_stats(NewWordStats {
                        user_id,
                        word_id: word.id,
                        priority_score: priority,
                    })
                    .await?
            }
        };

        for (stats_id, priority) in updates {
            self.store.update_stats_priority(stats_id, priority).await?;
        }

        Ok(Some((word, stats)))
    }

    /// Record explicit know / don't-know feedback and reprioritize with the
    /// steeper feedback curve.
    ///
    /// An unknown id is ignored. Returns the updated row, or None on the
    /// no-op path.
    pub async fn record_feedback(
        &self,
        stats_id: i64,
        knows_word: bool,
    ) -> Result<Option<DbWordStats>> {
        let Some(mut stats) = self.store.find_stats(stats_id).await? else {
            tracing::debug!(stats_id, "feedback for unknown stats row ignored");
            return Ok(None);
        };

        if knows_word {
            stats.know_count += 1;
        } else {
            stats.dont_know_count += 1;
        }

        let now = Utc::now();
        stats.last_shown = Some(now);
        stats.priority_score = feedback_priority(
            stats.know_count.max(0) as u32,
            stats.dont_know_count.max(0) as u32,
        );
        stats.updated_at = now;

        self.store.update_stats(&stats).await?;
        Ok(Some(stats))
    }

    /// Aggregate flashcard counts for a user.
    pub async fn learning_stats(&self, user_id: i64) -> Result<LearningStats> {
        let all = self.store.stats_for_user(user_id).await?;
        let available = self.catalog.words_by_levels(&self.levels, &[]).await?.len();

        let known = all
            .iter()
            .filter(|s| is_mastered(s.know_count.max(0) as u32, s.dont_know_count.max(0) as u32))
            .count();
        let touched = all
            .iter()
            .filter(|s| s.know_count > 0 || s.dont_know_count > 0)
            .count();

        Ok(LearningStats {
            total_words: all.len(),
            known_words: known,
            // Mastered rows always have feedback, so they are a subset.
            learning_words: touched - known,
            new_words: available.saturating_sub(all.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn word(id: i64, level: &str) -> DbWord {
        DbWord {
            id,
            word: format!("słowo-{id}"),
            translation: format!("translation-{id}"),
            example_sentence: None,
            level: level.to_string(),
            category: None,
        }
    }

    async fn seeded_store(words: &[(i64, &str)]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for (id, level) in words {
            store.insert_word(word(*id, level)).await;
        }
        store
    }

    fn service(store: Arc<MemoryStore>) -> LearningService {
        LearningService::new(store.clone(), store, vec![Level::A1, Level::A2])
    }

    #[tokio::test]
    async fn empty_pool_returns_none() {
        let store = seeded_store(&[]).await;
        let svc = service(store);

        let next = svc.next_word(1, &[]).await.unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn all_new_pool_picks_lowest_id_and_creates_one_row() {
        let store = seeded_store(&[(3, "A1"), (1, "A1"), (2, "A2")]).await;
        let svc = service(store.clone());

        let (word, stats) = svc.next_word(1, &[]).await.unwrap().unwrap();
        assert_eq!(word.id, 1);
        assert_eq!(stats.word_id, 1);
        assert_eq!(stats.priority_score, NEW_WORD_PRIORITY);

        // Only the winner was materialized.
        let tracked = store.stats_for_user(1).await.unwrap();
        assert_eq!(tracked.len(), 1);
    }

    #[tokio::test]
    async fn disallowed_levels_are_filtered_out() {
        let store = seeded_store(&[(1, "B1")]).await;
        let svc = service(store);

        let next = svc.next_word(1, &[]).await.unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn excluded_words_are_skipped() {
        let store = seeded_store(&[(1, "A1"), (2, "A1")]).await;
        let svc = service(store);

        let (word, _) = svc.next_word(1, &[1]).await.unwrap().unwrap();
        assert_eq!(word.id, 2);
    }

    #[tokio::test]
    async fn struggling_word_outranks_new_words() {
        let store = seeded_store(&[(1, "A1"), (2, "A1")]).await;
        let svc = service(store.clone());

        // Word 2: 5 mistakes, shown 40 days ago.
        // Selection priority: 5*3 - 0 + 40*2 + 10 = 105 > 100.
        let stats = store
            .insert_stats(NewWordStats {
                user_id: 1,
                word_id: 2,
                priority_score: NEW_WORD_PRIORITY,
            })
            .await
            .unwrap();
        let mut stats = store.find_stats(stats.id).await.unwrap().unwrap();
        stats.dont_know_count = 5;
        stats.last_shown = Some(Utc::now() - Duration::days(40));
        store.update_stats(&stats).await.unwrap();

        let (word, picked) = svc.next_word(1, &[]).await.unwrap().unwrap();
        assert_eq!(word.id, 2);
        assert_eq!(picked.priority_score, 105.0);

        // The recomputed priority was persisted.
        let persisted = store.find_stats(stats.id).await.unwrap().unwrap();
        assert_eq!(persisted.priority_score, 105.0);
    }

    #[tokio::test]
    async fn well_known_word_drops_below_new_words() {
        let store = seeded_store(&[(1, "A1"), (2, "A1")]).await;
        let svc = service(store.clone());

        let stats = store
            .insert_stats(NewWordStats {
                user_id: 1,
                word_id: 1,
                priority_score: NEW_WORD_PRIORITY,
            })
            .await
            .unwrap();
        let mut stats = store.find_stats(stats.id).await.unwrap().unwrap();
        stats.know_count = 5;
        stats.last_shown = Some(Utc::now());
        store.update_stats(&stats).await.unwrap();

        let (word, _) = svc.next_word(1, &[]).await.unwrap().unwrap();
        assert_eq!(word.id, 2);
    }

    #[tokio::test]
    async fn feedback_updates_counts_and_priority() {
        let store = seeded_store(&[(1, "A1")]).await;
        let svc = service(store.clone());

        let (_, stats) = svc.next_word(1, &[]).await.unwrap().unwrap();

        let updated = svc.record_feedback(stats.id, false).await.unwrap().unwrap();
        assert_eq!(updated.dont_know_count, 1);
        assert!(updated.last_shown.is_some());
        // 100 + 1^1.5 * 20 - 0 = 120
        assert!((updated.priority_score - 120.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn three_clean_passes_master_the_word() {
        let store = seeded_store(&[(1, "A1")]).await;
        let svc = service(store.clone());

        let (_, stats) = svc.next_word(1, &[]).await.unwrap().unwrap();
        for _ in 0..3 {
            svc.record_feedback(stats.id, true).await.unwrap();
        }

        let mastered = store.find_stats(stats.id).await.unwrap().unwrap();
        assert_eq!(mastered.know_count, 3);
        assert_eq!(mastered.dont_know_count, 0);

        // Flat mastery penalty of 50 below the pre-bonus value.
        let pre_bonus = 100.0 - 3f64.powf(0.8) * 8.0;
        assert!((mastered.priority_score - (pre_bonus - 50.0)).abs() < 1e-9);

        let stats = svc.learning_stats(1).await.unwrap();
        assert_eq!(stats.known_words, 1);
    }

    #[tokio::test]
    async fn unknown_stats_id_is_a_silent_noop() {
        let store = seeded_store(&[(1, "A1")]).await;
        let svc = service(store.clone());

        let result = svc.record_feedback(9999, true).await.unwrap();
        assert!(result.is_none());
        assert!(store.stats_for_user(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn learning_stats_counts_buckets() {
        let store = seeded_store(&[(1, "A1"), (2, "A1"), (3, "A2"), (4, "A2")]).await;
        let svc = service(store.clone());

        // Word 1 mastered, word 2 in progress, word 3 tracked but untouched.
        let (_, s1) = svc.next_word(1, &[]).await.unwrap().unwrap();
        for _ in 0..3 {
            svc.record_feedback(s1.id, true).await.unwrap();
        }
        let (_, s2) = svc.next_word(1, &[1]).await.unwrap().unwrap();
        svc.record_feedback(s2.id, false).await.unwrap();
        svc.next_word(1, &[1, 2]).await.unwrap();

        let stats = svc.learning_stats(1).await.unwrap();
        assert_eq!(
            stats,
            LearningStats {
                total_words: 3,
                known_words: 1,
                learning_words: 1,
                new_words: 1,
            }
        );
    }
}
