//! Collaborator seams.
//!
//! The pipeline calls external services only through these traits; the
//! reqwest clients in this crate are the production implementations and
//! tests substitute scripted fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CollabResult;

/// A channel returned by the search collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMatch {
    /// Canonical channel ID
    pub channel_id: String,
    /// Channel display name
    pub channel_name: String,
}

/// A video returned by the listing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoItem {
    /// YouTube video ID
    pub video_id: String,
    /// Current title
    pub title: String,
    /// Publish time
    pub published_at: DateTime<Utc>,
    /// Default thumbnail URL
    pub thumbnail_url: String,
}

/// An email handed to the notification collaborator.
///
/// The sender address is owned by the client configuration, not the
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEmail {
    /// Destination address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
}

/// Provider acknowledgement for a dispatched email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentEmail {
    /// Provider-assigned message identifier
    pub id: String,
}

/// Channel-search collaborator.
#[async_trait]
pub trait ChannelSearch: Send + Sync {
    /// Search for a channel by handle or name; at most one match.
    async fn search_channel(&self, query: &str) -> CollabResult<Vec<ChannelMatch>>;
}

/// Video-listing collaborator.
#[async_trait]
pub trait VideoListing: Send + Sync {
    /// List a channel's most recent uploads, newest first.
    async fn list_recent(&self, channel_id: &str, limit: u8) -> CollabResult<Vec<VideoItem>>;
}

/// Title-generation collaborator.
///
/// Opaque text in, raw text out: the caller owns prompt construction and
/// JSON-shape validation of the reply.
#[async_trait]
pub trait TitleGenerator: Send + Sync {
    /// Run one generation request and return the raw model text.
    async fn generate(&self, prompt: &str) -> CollabResult<String>;
}

/// Notification-dispatch collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Dispatch one email and return the provider's identifier.
    async fn send(&self, email: OutboundEmail) -> CollabResult<SentEmail>;
}
