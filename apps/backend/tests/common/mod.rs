//! Common test utilities and fixtures for integration tests.
//!
//! The services take injected store handles, so the API tests run against
//! the in-memory store and need no external database.

pub mod fixtures;

use std::sync::Arc;

use axum::Router;

use srs_core::{Level, Sm2};
use vocab_trainer_backend::models::DbWord;
use vocab_trainer_backend::router;
use vocab_trainer_backend::services::{LearningService, ReviewService};
use vocab_trainer_backend::store::memory::MemoryStore;
use vocab_trainer_backend::AppState;

/// Test context with an in-memory store and the full API router.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let state = AppState {
            review: ReviewService::new(store.clone(), Sm2::default(), 10),
            learning: LearningService::new(
                store.clone(),
                store.clone(),
                vec![Level::A1, Level::A2],
            ),
        };

        let app = router(state);

        Self { store, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Seed vocabulary entries into the catalog.
    pub async fn seed_words(&self, words: Vec<DbWord>) {
        for word in words {
            self.store.insert_word(word).await;
        }
    }
}
