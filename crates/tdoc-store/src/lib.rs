//! Job store: the single source of truth for job progress.
//!
//! This crate provides:
//! - The [`JobStore`] trait stages and the API read and write through
//! - [`MemoryJobStore`], the in-process implementation

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{JobStore, MemoryJobStore};
