//! Bus error types.

use thiserror::Error;

pub type BusResult<T> = Result<T, BusError>;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("Bus closed: {0}")]
    Closed(String),
}

impl BusError {
    pub fn closed(msg: impl Into<String>) -> Self {
        Self::Closed(msg.into())
    }
}
