//! Request handlers.

pub mod health;
pub mod jobs;
pub mod submit;

pub use health::health;
pub use jobs::get_job;
pub use submit::submit_job;
