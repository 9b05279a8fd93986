//! Event topics and typed payloads.
//!
//! Each bus topic has exactly one payload shape, encoded as a variant of
//! [`Event`]. A missing field is therefore a construction-time fault, not a
//! runtime lookup failure, and every payload carries the `job_id`/`email`
//! pair needed to correlate and notify.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::JobId;
use crate::video::{ImprovedTitle, VideoSummary};

/// A named event channel.
///
/// Serializes to the same dotted wire names as [`Topic::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Topic {
    #[serde(rename = "job.submitted")]
    JobSubmitted,
    #[serde(rename = "channel.resolved")]
    ChannelResolved,
    #[serde(rename = "channel.error")]
    ChannelError,
    #[serde(rename = "videos.fetched")]
    VideosFetched,
    #[serde(rename = "videos.error")]
    VideosError,
    #[serde(rename = "titles.generated")]
    TitlesGenerated,
    #[serde(rename = "titles.error")]
    TitlesError,
    #[serde(rename = "email.sent")]
    EmailSent,
    #[serde(rename = "email.error")]
    EmailError,
    #[serde(rename = "error.notified")]
    ErrorNotified,
}

impl Topic {
    /// Get the dotted wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::JobSubmitted => "job.submitted",
            Topic::ChannelResolved => "channel.resolved",
            Topic::ChannelError => "channel.error",
            Topic::VideosFetched => "videos.fetched",
            Topic::VideosError => "videos.error",
            Topic::TitlesGenerated => "titles.generated",
            Topic::TitlesError => "titles.error",
            Topic::EmailSent => "email.sent",
            Topic::EmailError => "email.error",
            Topic::ErrorNotified => "error.notified",
        }
    }

    /// The error topics funneled into the compensation sink.
    pub const FAILURES: [Topic; 4] = [
        Topic::ChannelError,
        Topic::VideosError,
        Topic::TitlesError,
        Topic::EmailError,
    ];
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A published event: one variant per topic.
///
/// Success payloads carry the deliberate subset of job fields the next
/// stage needs, not the full snapshot. Error payloads carry a user-safe
/// message only; the raw failure stays in the store and the logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "topic")]
pub enum Event {
    #[serde(rename = "job.submitted")]
    JobSubmitted {
        job_id: JobId,
        channel: String,
        email: String,
    },
    #[serde(rename = "channel.resolved")]
    ChannelResolved {
        job_id: JobId,
        email: String,
        channel_id: String,
        channel_name: String,
    },
    #[serde(rename = "channel.error")]
    ChannelError {
        job_id: JobId,
        email: String,
        error: String,
    },
    #[serde(rename = "videos.fetched")]
    VideosFetched {
        job_id: JobId,
        email: String,
        channel_name: String,
        videos: Vec<VideoSummary>,
    },
    #[serde(rename = "videos.error")]
    VideosError {
        job_id: JobId,
        email: String,
        error: String,
    },
    #[serde(rename = "titles.generated")]
    TitlesGenerated {
        job_id: JobId,
        email: String,
        channel_name: String,
        improved_titles: Vec<ImprovedTitle>,
    },
    #[serde(rename = "titles.error")]
    TitlesError {
        job_id: JobId,
        email: String,
        error: String,
    },
    #[serde(rename = "email.sent")]
    EmailSent {
        job_id: JobId,
        email: String,
        email_id: String,
    },
    #[serde(rename = "email.error")]
    EmailError {
        job_id: JobId,
        email: String,
        error: String,
    },
    #[serde(rename = "error.notified")]
    ErrorNotified {
        job_id: JobId,
        email: String,
        email_id: String,
    },
}

impl Event {
    /// The topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            Event::JobSubmitted { .. } => Topic::JobSubmitted,
            Event::ChannelResolved { .. } => Topic::ChannelResolved,
            Event::ChannelError { .. } => Topic::ChannelError,
            Event::VideosFetched { .. } => Topic::VideosFetched,
            Event::VideosError { .. } => Topic::VideosError,
            Event::TitlesGenerated { .. } => Topic::TitlesGenerated,
            Event::TitlesError { .. } => Topic::TitlesError,
            Event::EmailSent { .. } => Topic::EmailSent,
            Event::EmailError { .. } => Topic::EmailError,
            Event::ErrorNotified { .. } => Topic::ErrorNotified,
        }
    }

    /// The job this event belongs to.
    pub fn job_id(&self) -> &JobId {
        match self {
            Event::JobSubmitted { job_id, .. }
            | Event::ChannelResolved { job_id, .. }
            | Event::ChannelError { job_id, .. }
            | Event::VideosFetched { job_id, .. }
            | Event::VideosError { job_id, .. }
            | Event::TitlesGenerated { job_id, .. }
            | Event::TitlesError { job_id, .. }
            | Event::EmailSent { job_id, .. }
            | Event::EmailError { job_id, .. }
            | Event::ErrorNotified { job_id, .. } => job_id,
        }
    }

    /// The destination email carried by the payload.
    pub fn email(&self) -> &str {
        match self {
            Event::JobSubmitted { email, .. }
            | Event::ChannelResolved { email, .. }
            | Event::ChannelError { email, .. }
            | Event::VideosFetched { email, .. }
            | Event::VideosError { email, .. }
            | Event::TitlesGenerated { email, .. }
            | Event::TitlesError { email, .. }
            | Event::EmailSent { email, .. }
            | Event::EmailError { email, .. }
            | Event::ErrorNotified { email, .. } => email,
        }
    }

    /// Destructure a failure event into `(job_id, email, error)`.
    ///
    /// Returns `None` for non-error topics.
    pub fn failure_parts(&self) -> Option<(&JobId, &str, &str)> {
        match self {
            Event::ChannelError { job_id, email, error }
            | Event::VideosError { job_id, email, error }
            | Event::TitlesError { job_id, email, error }
            | Event::EmailError { job_id, email, error } => {
                Some((job_id, email.as_str(), error.as_str()))
            }
            _ => None,
        }
    }

    /// Build the error event for the channel-resolution stage.
    pub fn channel_error(job_id: JobId, email: String, error: String) -> Self {
        Event::ChannelError { job_id, email, error }
    }

    /// Build the error event for the video-listing stage.
    pub fn videos_error(job_id: JobId, email: String, error: String) -> Self {
        Event::VideosError { job_id, email, error }
    }

    /// Build the error event for the title-generation stage.
    pub fn titles_error(job_id: JobId, email: String, error: String) -> Self {
        Event::TitlesError { job_id, email, error }
    }

    /// Build the error event for the report-dispatch stage.
    pub fn email_error(job_id: JobId, email: String, error: String) -> Self {
        Event::EmailError { job_id, email, error }
    }
}
