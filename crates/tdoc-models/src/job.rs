//! Job record and merge semantics.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::job_status::JobStatus;
use crate::video::{ImprovedTitle, VideoSummary};

/// Unique identifier for a job.
///
/// Generated at submission and used as the sole correlation key across
/// events and store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's end-to-end request, tracked as a single evolving record.
///
/// Updates are merges: a [`JobPatch`] only ever adds or replaces fields,
/// never clears them, so each stage's contribution survives later writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID, immutable once created
    pub job_id: JobId,

    /// Channel identifier as submitted (handle or name)
    pub channel: String,

    /// Destination email address
    pub email: String,

    /// Current progress marker
    #[serde(default)]
    pub status: JobStatus,

    /// Resolved channel ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// Resolved channel display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,

    /// Recent uploads, in the order they were fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoSummary>>,

    /// Title suggestions, aligned with `videos`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improved_titles: Option<Vec<ImprovedTitle>>,

    /// Last failure message (raw, for operator diagnosis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Provider-assigned identifier of the dispatched email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Completion timestamp (success or handled failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new job at status `queued`.
    pub fn new(job_id: JobId, channel: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            job_id,
            channel: channel.into(),
            email: email.into(),
            status: JobStatus::Queued,
            channel_id: None,
            channel_name: None,
            videos: None,
            improved_titles: None,
            error: None,
            email_id: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Create an empty shell for a job ID the store has never seen.
    ///
    /// Stages merge onto this when an event arrives before the initial
    /// record is visible, so a store miss never aborts a stage.
    pub fn shell(job_id: JobId) -> Self {
        Self::new(job_id, "", "")
    }

    /// Merge a patch onto this snapshot.
    ///
    /// Only the fields the patch carries are applied; merging the same
    /// patch twice yields the same snapshot as merging it once.
    pub fn merge(&mut self, patch: JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(channel_id) = patch.channel_id {
            self.channel_id = Some(channel_id);
        }
        if let Some(channel_name) = patch.channel_name {
            self.channel_name = Some(channel_name);
        }
        if let Some(videos) = patch.videos {
            self.videos = Some(videos);
        }
        if let Some(improved_titles) = patch.improved_titles {
            self.improved_titles = Some(improved_titles);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
        if let Some(email_id) = patch.email_id {
            self.email_id = Some(email_id);
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
    }
}

/// A partial update to a [`Job`].
///
/// Fields left `None` are untouched by [`Job::merge`]; there is no way to
/// clear a field through a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub videos: Option<Vec<VideoSummary>>,
    pub improved_titles: Option<Vec<ImprovedTitle>>,
    pub error: Option<String>,
    pub email_id: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobPatch {
    /// Start a patch that moves the job to `status`.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Record the resolved channel identity.
    pub fn with_channel(mut self, channel_id: impl Into<String>, channel_name: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self.channel_name = Some(channel_name.into());
        self
    }

    /// Record the fetched videos.
    pub fn with_videos(mut self, videos: Vec<VideoSummary>) -> Self {
        self.videos = Some(videos);
        self
    }

    /// Record the generated title suggestions.
    pub fn with_improved_titles(mut self, improved_titles: Vec<ImprovedTitle>) -> Self {
        self.improved_titles = Some(improved_titles);
        self
    }

    /// Record a failure message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Record the provider's email identifier.
    pub fn with_email_id(mut self, email_id: impl Into<String>) -> Self {
        self.email_id = Some(email_id.into());
        self
    }

    /// Record the completion timestamp.
    pub fn with_completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }
}
