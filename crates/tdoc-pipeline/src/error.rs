//! Stage error types.

use thiserror::Error;

use tdoc_bus::BusError;
use tdoc_collab::CollabError;
use tdoc_store::StoreError;

pub type StageResult<T> = Result<T, StageError>;

/// A failed stage attempt.
///
/// `Empty` carries a domain message that doubles as the user-safe string;
/// every other variant is sanitized to the stage's generic fallback before
/// it crosses a topic boundary.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("{0}")]
    Empty(String),

    #[error("Model response invalid: {0}")]
    InvalidResponse(String),

    #[error("Collaborator call failed: {0}")]
    Collab(#[from] CollabError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Bus operation failed: {0}")]
    Bus(#[from] BusError),
}

impl StageError {
    /// A structurally valid but empty collaborator result.
    pub fn empty(msg: impl Into<String>) -> Self {
        Self::Empty(msg.into())
    }

    /// A model reply that could not be validated against the request.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether this is a business-empty fault.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, StageError::Empty(_))
    }
}
