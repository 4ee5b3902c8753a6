//! Shared types for the scheduling core.

use serde::{Deserialize, Serialize};

use crate::error::InvalidQuality;

/// Recall quality on the 0-5 SuperMemo scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Complete blackout.
    Blackout,
    /// Incorrect, but the word felt familiar.
    IncorrectFamiliar,
    /// Incorrect, but remembered once the answer was shown.
    IncorrectRecalled,
    /// Correct with serious difficulty.
    CorrectHard,
    /// Correct after hesitation.
    CorrectHesitant,
    /// Perfect recall.
    Perfect,
}

impl Quality {
    /// Convert to the numeric 0-5 grade.
    pub fn to_value(self) -> u8 {
        match self {
            Self::Blackout => 0,
            Self::IncorrectFamiliar => 1,
            Self::IncorrectRecalled => 2,
            Self::CorrectHard => 3,
            Self::CorrectHesitant => 4,
            Self::Perfect => 5,
        }
    }

    /// Create from a numeric 0-5 grade.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Blackout),
            1 => Some(Self::IncorrectFamiliar),
            2 => Some(Self::IncorrectRecalled),
            3 => Some(Self::CorrectHard),
            4 => Some(Self::CorrectHesitant),
            5 => Some(Self::Perfect),
            _ => None,
        }
    }

    /// Grades of 3 and above count as successful recall.
    pub fn is_passing(self) -> bool {
        self.to_value() >= 3
    }
}

impl TryFrom<u8> for Quality {
    type Error = InvalidQuality;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(InvalidQuality(value))
    }
}

/// SM-2 schedule state for one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Consecutive successful recalls since the last lapse.
    pub repetitions: u32,
    /// Per-word interval multiplier, never below the configured floor.
    pub easiness_factor: f64,
    /// Days until the next scheduled exposure; 0 means due now.
    pub interval_days: u32,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            repetitions: 0,
            easiness_factor: 2.5,
            interval_days: 0,
        }
    }
}

/// Display bucket for a word's progress, 0-5.
pub fn stage(repetitions: u32) -> u8 {
    repetitions.min(5) as u8
}

/// CEFR difficulty level of a vocabulary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            _ => None,
        }
    }
}

/// Aggregate counts over a user's SM-2 progress rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total: usize,
    pub due_now: usize,
    pub mastered: usize,
    pub learning: usize,
    pub new: usize,
}

/// Aggregate counts over a user's flashcard exposure rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_words: usize,
    pub known_words: usize,
    pub learning_words: usize,
    pub new_words: usize,
}
