//! Review (SM-2) endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// POST /api/review/words
pub async fn add_word(
    State(state): State<AppState>,
    Json(payload): Json<AddWordRequest>,
) -> Result<Json<Option<DbReviewProgress>>> {
    let progress = state
        .review
        .add_word_to_user(payload.user_id, payload.word_id)
        .await?;

    Ok(Json(progress))
}

/// GET /api/review/due
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<DbReviewProgress>>> {
    let due = state.review.due_words(query.user_id, query.limit).await?;

    Ok(Json(due))
}

/// POST /api/review/answer
pub async fn answer(
    State(state): State<AppState>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    let quality = Quality::from_value(payload.quality)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid quality: {}", payload.quality)))?;

    let updated = state
        .review
        .apply_answer(payload.progress_id, quality, payload.is_correct)
        .await?;

    Ok(Json(AnswerResponse {
        applied: updated.is_some(),
    }))
}

/// GET /api/review/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ReviewStats>> {
    let stats = state.review.review_stats(query.user_id).await?;

    Ok(Json(stats))
}
