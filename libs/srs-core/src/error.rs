//! Error types for srs-core.

use thiserror::Error;

/// Recall grade outside the 0-5 SuperMemo scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid recall quality {0}, expected 0-5")]
pub struct InvalidQuality(pub u8);
