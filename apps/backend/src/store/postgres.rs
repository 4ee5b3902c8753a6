//! PostgreSQL store implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{ApiError, Result};
use crate::models::{DbReviewProgress, DbWord, DbWordStats};
use crate::store::{NewReviewProgress, NewWordStats, ProgressStore, VocabularyCatalog};
use srs_core::Level;

const PROGRESS_COLUMNS: &str = "id, user_id, word_id, stage, next_review_time, last_quality, \
     repetitions, easiness_factor, interval_days, last_reviewed, \
     times_reviewed, times_correct, times_wrong";

const STATS_COLUMNS: &str = "id, user_id, word_id, know_count, dont_know_count, last_shown, \
     priority_score, created_at, updated_at";

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn progress_for_user(&self, user_id: i64) -> Result<Vec<DbReviewProgress>> {
        let rows = sqlx::query_as::<_, DbReviewProgress>(&format!(
            r#"
            SELECT {PROGRESS_COLUMNS}
            FROM review_progress
            WHERE user_id = $1
            ORDER BY id
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_progress(&self, progress_id: i64) -> Result<Option<DbReviewProgress>> {
        let row = sqlx::query_as::<_, DbReviewProgress>(&format!(
            r#"
            SELECT {PROGRESS_COLUMNS}
            FROM review_progress
            WHERE id = $1
            "#,
        ))
        .bind(progress_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_progress_by_word(
        &self,
        user_id: i64,
        word_id: i64,
    ) -> Result<Option<DbReviewProgress>> {
        let row = sqlx::query_as::<_, DbReviewProgress>(&format!(
            r#"
            SELECT {PROGRESS_COLUMNS}
            FROM review_progress
            WHERE user_id = $1 AND word_id = $2
            "#,
        ))
        .bind(user_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn due_progress(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<DbReviewProgress>> {
        let rows = sqlx::query_as::<_, DbReviewProgress>(&format!(
            r#"
            SELECT {PROGRESS_COLUMNS}
            FROM review_progress
            WHERE user_id = $1 AND next_review_time <= $2
            ORDER BY next_review_time
            LIMIT $3
            "#,
        ))
        .bind(user_id)
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_progress(&self, new: NewReviewProgress) -> Result<DbReviewProgress> {
        let row = sqlx::query_as::<_, DbReviewProgress>(&format!(
            r#"
            INSERT INTO review_progress (user_id, word_id, easiness_factor, next_review_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROGRESS_COLUMNS}
            "#,
        ))
        .bind(new.user_id)
        .bind(new.word_id)
        .bind(new.easiness_factor)
        .bind(new.next_review_time)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_progress(&self, progress: &DbReviewProgress) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE review_progress
            SET stage = $2,
                next_review_time = $3,
                last_quality = $4,
                repetitions = $5,
                easiness_factor = $6,
                interval_days = $7,
                last_reviewed = $8,
                times_reviewed = $9,
                times_correct = $10,
                times_wrong = $11
            WHERE id = $1
            "#,
        )
        .bind(progress.id)
        .bind(progress.stage)
        .bind(progress.next_review_time)
        .bind(progress.last_quality)
        .bind(progress.repetitions)
        .bind(progress.easiness_factor)
        .bind(progress.interval_days)
        .bind(progress.last_reviewed)
        .bind(progress.times_reviewed)
        .bind(progress.times_correct)
        .bind(progress.times_wrong)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_progress(&self, progress_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM review_progress WHERE id = $1")
            .bind(progress_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn stats_for_user(&self, user_id: i64) -> Result<Vec<DbWordStats>> {
        let rows = sqlx::query_as::<_, DbWordStats>(&format!(
            r#"
            SELECT {STATS_COLUMNS}
            FROM word_learning_stats
            WHERE user_id = $1
            ORDER BY id
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_stats(&self, stats_id: i64) -> Result<Option<DbWordStats>> {
        let row = sqlx::query_as::<_, DbWordStats>(&format!(
            r#"
            SELECT {STATS_COLUMNS}
            FROM word_learning_stats
            WHERE id = $1
            "#,
        ))
        .bind(stats_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn stats_for_words(&self, user_id: i64, word_ids: &[i64]) -> Result<Vec<DbWordStats>> {
        let rows = sqlx::query_as::<_, DbWordStats>(&format!(
            r#"
            SELECT {STATS_COLUMNS}
            FROM word_learning_stats
            WHERE user_id = $1 AND word_id = ANY($2)
            "#,
        ))
        .bind(user_id)
        .bind(word_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_stats(&self, new: NewWordStats) -> Result<DbWordStats> {
        let row = sqlx::query_as::<_, DbWordStats>(&format!(
            r#"
            INSERT INTO word_learning_stats (user_id, word_id, priority_score)
            VALUES ($1, $2, $3)
            RETURNING {STATS_COLUMNS}
            "#,
        ))
        .bind(new.user_id)
        .bind(new.word_id)
        .bind(new.priority_score)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_stats(&self, stats: &DbWordStats) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE word_learning_stats
            SET know_count = $2,
                dont_know_count = $3,
                last_shown = $4,
                priority_score = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(stats.id)
        .bind(stats.know_count)
        .bind(stats.dont_know_count)
        .bind(stats.last_shown)
        .bind(stats.priority_score)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_stats_priority(&self, stats_id: i64, priority: f64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE word_learning_stats
            SET priority_score = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(stats_id)
        .bind(priority)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_stats(&self, stats_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM word_learning_stats WHERE id = $1")
            .bind(stats_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl VocabularyCatalog for PgStore {
    async fn words_by_levels(&self, levels: &[Level], exclude: &[i64]) -> Result<Vec<DbWord>> {
        let level_codes: Vec<String> = levels.iter().map(|l| l.as_str().to_string()).collect();

        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, word, translation, example_sentence, level, category
            FROM words
            WHERE level = ANY($1) AND id != ALL($2)
            ORDER BY id
            "#,
        )
        .bind(&level_codes)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;

        Ok(words)
    }

    async fn word(&self, word_id: i64) -> Result<Option<DbWord>> {
        let word = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT id, word, translation, example_sentence, level, category
            FROM words
            WHERE id = $1
            "#,
        )
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(word)
    }
}
