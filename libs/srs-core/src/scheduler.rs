//! SM-2 spaced repetition scheduler.
//!
//! SuperMemo-2 variant with configurable parameters.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Quality, ReviewState};

/// SM-2 scheduler with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    /// Easiness factor for newly tracked words.
    pub initial_ease: f64,
    /// Floor below which the easiness factor never drops.
    pub minimum_ease: f64,
    /// Interval after the first successful recall, in days.
    pub initial_interval: u32,
    /// Interval after the second successful recall, in days.
    pub graduation_interval: u32,
    /// Optional interval ceiling; None leaves growth uncapped.
    pub maximum_interval: Option<u32>,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            initial_interval: 1,
            graduation_interval: 6,
            maximum_interval: None,
        }
    }
}

/// Result of scheduling a word after a graded answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub state: ReviewState,
    pub next_due: DateTime<Utc>,
}

impl Sm2 {
    /// State for a word that has never been reviewed: due immediately.
    pub fn initial_state(&self) -> ReviewState {
        ReviewState {
            repetitions: 0,
            easiness_factor: self.initial_ease,
            interval_days: 0,
        }
    }

    /// Core SM-2 step.
    ///
    /// Returns `(new_interval_days, new_easiness_factor, new_repetitions)`.
    /// A grade below 3 is a lapse: repetitions and interval reset to zero.
    /// The easiness factor is adjusted on both pass and fail, clamped to
    /// `minimum_ease`.
    pub fn compute(
        &self,
        quality: Quality,
        repetitions: u32,
        easiness_factor: f64,
        interval_days: u32,
    ) -> (u32, f64, u32) {
        let (new_interval, new_repetitions) = if quality.is_passing() {
            let interval = match repetitions {
                0 => self.initial_interval,
                1 => self.graduation_interval,
                _ => (interval_days as f64 * easiness_factor).round() as u32,
            };
            let interval = match self.maximum_interval {
                Some(cap) => interval.min(cap),
                None => interval,
            };
            (interval, repetitions + 1)
        } else {
            (0, 0)
        };

        let q = quality.to_value() as f64;
        let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
        let new_ease = (easiness_factor + delta).max(self.minimum_ease);

        (new_interval, new_ease, new_repetitions)
    }

    /// Apply a graded answer to a review state.
    pub fn schedule(
        &self,
        state: &ReviewState,
        quality: Quality,
        now: DateTime<Utc>,
    ) -> SchedulingResult {
        let (interval_days, easiness_factor, repetitions) = self.compute(
            quality,
            state.repetitions,
            state.easiness_factor,
            state.interval_days,
        );

        SchedulingResult {
            state: ReviewState {
                repetitions,
                easiness_factor,
                interval_days,
            },
            next_due: now + Duration::days(interval_days as i64),
        }
    }
}
