pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{LearningService, ReviewService};
use crate::store::postgres::PgStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub review: ReviewService,
    pub learning: LearningService,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let store = Arc::new(PgStore::connect(&config.database_url).await?);

    tracing::info!("Running migrations...");
    store.run_migrations().await?;

    let state = AppState {
        review: ReviewService::new(
            store.clone(),
            config.sm2(),
            config.max_reviews_per_session,
        ),
        learning: LearningService::new(
            store.clone(),
            store.clone(),
            config.learning_levels.clone(),
        ),
    };

    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Review routes
        .route("/api/review/words", post(routes::review::add_word))
        .route("/api/review/due", get(routes::review::due))
        .route("/api/review/answer", post(routes::review::answer))
        .route("/api/review/stats", get(routes::review::stats))
        // Learning routes
        .route("/api/learning/next", get(routes::learning::next_word))
        .route("/api/learning/feedback", post(routes::learning::feedback))
        .route("/api/learning/stats", get(routes::learning::stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
