//! Core scheduling library for the vocab trainer.
//!
//! Provides:
//! - SM-2 spaced repetition scheduler with configurable parameters
//! - Urgency formulas for first-pass flashcard selection
//! - Shared types (Quality, ReviewState, Level, stats records)
//!
//! Everything here is pure computation: no I/O, no clocks of its own,
//! deterministic for identical inputs.

pub mod error;
pub mod priority;
pub mod scheduler;
pub mod types;

pub use error::InvalidQuality;
pub use priority::{
    days_since_shown, feedback_priority, is_mastered, selection_priority, NEW_WORD_PRIORITY,
};
pub use scheduler::{SchedulingResult, Sm2};
pub use types::{stage, LearningStats, Level, Quality, ReviewState, ReviewStats};
