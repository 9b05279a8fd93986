//! Video summaries and improved-title suggestions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One recent upload from the resolved channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoSummary {
    /// YouTube video ID
    pub video_id: String,
    /// Current title
    pub title: String,
    /// Watch URL
    pub url: String,
    /// Publish time
    pub published_at: DateTime<Utc>,
    /// Default thumbnail URL
    pub thumbnail: String,
}

impl VideoSummary {
    /// Build the canonical watch URL for a video ID.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

/// An improved title suggestion for one video.
///
/// Ordering matches the order of the videos the suggestions were generated
/// for; `video_id` and `url` are carried so the report never has to join
/// back against the video list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImprovedTitle {
    /// Video the suggestion applies to
    pub video_id: String,
    /// The title as uploaded
    pub original_title: String,
    /// Suggested replacement
    pub improved_title: String,
    /// One or two sentences on why the replacement is better
    pub rationale: String,
    /// Watch URL of the video
    pub url: String,
}
