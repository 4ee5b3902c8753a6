//! Flashcard learning endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/learning/next
pub async fn next_word(
    State(state): State<AppState>,
    Query(query): Query<NextWordQuery>,
) -> Result<Json<Option<NextWordResponse>>> {
    let exclude = parse_exclude(query.exclude.as_deref())?;

    let next = state.learning.next_word(query.user_id, &exclude).await?;

    Ok(Json(
        next.map(|(word, stats)| NextWordResponse { word, stats }),
    ))
}

/// POST /api/learning/feedback
pub async fn feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>> {
    let updated = state
        .learning
        .record_feedback(payload.stats_id, payload.knows_word)
        .await?;

    Ok(Json(FeedbackResponse {
        applied: updated.is_some(),
    }))
}

/// GET /api/learning/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<LearningStats>> {
    let stats = state.learning.learning_stats(query.user_id).await?;

    Ok(Json(stats))
}

/// Parse the comma-separated `exclude` query parameter.
fn parse_exclude(raw: Option<&str>) -> Result<Vec<i64>> {
    match raw {
        Some(list) if !list.trim().is_empty() => list
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|_| ApiError::BadRequest(format!("invalid word id: {}", part)))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}
