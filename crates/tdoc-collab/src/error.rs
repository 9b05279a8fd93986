//! Collaborator error types.

use thiserror::Error;

pub type CollabResult<T> = Result<T, CollabError>;

#[derive(Debug, Error)]
pub enum CollabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl CollabError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
