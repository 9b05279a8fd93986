//! Axum HTTP entry point for TitleDoctor.
//!
//! The API is a thin boundary: it validates a submission, persists the
//! initial job record, emits `job.submitted`, and answers 202. Everything
//! after that happens on the event bus.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
