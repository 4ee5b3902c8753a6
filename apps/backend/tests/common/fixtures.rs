//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use vocab_trainer_backend::models::DbWord;

/// Create a vocabulary entry.
pub fn word(id: i64, level: &str) -> DbWord {
    DbWord {
        id,
        word: format!("word-{}", id),
        translation: format!("translation-{}", id),
        example_sentence: Some(format!("Example sentence for word {}.", id)),
        level: level.to_string(),
        category: None,
    }
}

/// Create an add-word request body.
pub fn add_word_request(user_id: i64, word_id: i64) -> serde_json::Value {
    json!({ "user_id": user_id, "word_id": word_id })
}

/// Create an answer request body.
pub fn answer_request(progress_id: i64, quality: u8, is_correct: bool) -> serde_json::Value {
    json!({
        "progress_id": progress_id,
        "quality": quality,
        "is_correct": is_correct,
    })
}

/// Create a feedback request body.
pub fn feedback_request(stats_id: i64, knows_word: bool) -> serde_json::Value {
    json!({ "stats_id": stats_id, "knows_word": knows_word })
}
