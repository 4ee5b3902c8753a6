//! Environment-driven configuration.
//!
//! All scheduling parameters are supplied here; nothing is hardcoded in the
//! core logic.

use anyhow::{anyhow, Context};

use srs_core::{Level, Sm2};

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Floor for the SM-2 easiness factor.
    pub min_easiness: f64,
    /// Interval after the first successful recall, in days.
    pub initial_interval: u32,
    /// Interval after the second successful recall, in days.
    pub graduation_interval: u32,
    /// Optional interval ceiling; unset leaves growth uncapped.
    pub maximum_interval: Option<u32>,
    /// Default cap on due words returned per review session.
    pub max_reviews_per_session: usize,
    /// Difficulty levels served by the flashcard learning mode.
    pub learning_levels: Vec<Level>,
}

impl Config {
    /// Load configuration, falling back to defaults for everything except
    /// `DATABASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3000)?,
            min_easiness: parse_var("SRS_MIN_EASINESS", 1.3)?,
            initial_interval: parse_var("SRS_INITIAL_INTERVAL", 1)?,
            graduation_interval: parse_var("SRS_GRADUATION_INTERVAL", 6)?,
            maximum_interval: parse_optional_var("SRS_MAX_INTERVAL")?,
            max_reviews_per_session: parse_var("MAX_REVIEWS_PER_SESSION", 10)?,
            learning_levels: parse_levels(
                &std::env::var("LEARNING_LEVELS").unwrap_or_else(|_| "A1,A2".to_string()),
            )?,
        })
    }

    /// SM-2 scheduler configured from these settings.
    pub fn sm2(&self) -> Sm2 {
        Sm2 {
            minimum_ease: self.min_easiness,
            initial_interval: self.initial_interval,
            graduation_interval: self.graduation_interval,
            maximum_interval: self.maximum_interval,
            ..Sm2::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}", name)),
        Err(_) => Ok(default),
    }
}

fn parse_optional_var<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {}", name)),
        Err(_) => Ok(None),
    }
}

fn parse_levels(raw: &str) -> anyhow::Result<Vec<Level>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Level::from_str(part).ok_or_else(|| anyhow!("unknown level: {}", part)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_list() {
        let levels = parse_levels("A1, A2").unwrap();
        assert_eq!(levels, vec![Level::A1, Level::A2]);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(parse_levels("A1,C2").is_err());
    }

    #[test]
    fn empty_segments_are_skipped() {
        let levels = parse_levels("B1,").unwrap();
        assert_eq!(levels, vec![Level::B1]);
    }
}
