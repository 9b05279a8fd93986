//! API routes.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{get_job, health, submit_job};
use crate::state::AppState;

/// Submission bodies are tiny; anything larger is noise.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/submit", post(submit_job))
        .route("/jobs/:job_id", get(get_job))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .with_state(state)
}
