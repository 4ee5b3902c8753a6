//! Scheduling services over the injected stores.

pub mod learning;
pub mod review;

pub use learning::LearningService;
pub use review::ReviewService;
