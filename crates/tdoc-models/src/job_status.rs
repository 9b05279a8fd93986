//! Job status lifecycle.
//!
//! A job walks the happy path
//! `queued -> resolving channel -> channel resolved -> fetching videos ->
//! videos fetched -> generating titles -> titles generated -> sending email ->
//! email sent`, with a `failed` branch reachable from any in-progress state.
//! A failed job is then picked up by the error notifier, which moves it
//! through `sending email` to `error notification email sent`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Progress marker for a job.
///
/// The serialized form uses the human-readable labels the rest of the
/// system (store snapshots, API responses) exposes to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum JobStatus {
    /// Job accepted, waiting for the first stage
    #[default]
    #[serde(rename = "queued")]
    Queued,
    /// ResolveChannel is looking up the channel
    #[serde(rename = "resolving channel")]
    ResolvingChannel,
    /// Channel identity is known
    #[serde(rename = "channel resolved")]
    ChannelResolved,
    /// FetchVideos is listing recent uploads
    #[serde(rename = "fetching videos")]
    FetchingVideos,
    /// Recent uploads recorded on the job
    #[serde(rename = "videos fetched")]
    VideosFetched,
    /// GenerateTitles is waiting on the model
    #[serde(rename = "generating titles")]
    GeneratingTitles,
    /// Improved titles recorded on the job
    #[serde(rename = "titles generated")]
    TitlesGenerated,
    /// A report or failure notification is being dispatched
    #[serde(rename = "sending email")]
    SendingEmail,
    /// Terminal success: the report reached the provider
    #[serde(rename = "email sent")]
    EmailSent,
    /// A stage failed; forward progress is frozen
    #[serde(rename = "failed")]
    Failed,
    /// Terminal handled failure: the user was notified
    #[serde(rename = "error notification email sent")]
    ErrorNotified,
}

impl JobStatus {
    /// Get the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::ResolvingChannel => "resolving channel",
            JobStatus::ChannelResolved => "channel resolved",
            JobStatus::FetchingVideos => "fetching videos",
            JobStatus::VideosFetched => "videos fetched",
            JobStatus::GeneratingTitles => "generating titles",
            JobStatus::TitlesGenerated => "titles generated",
            JobStatus::SendingEmail => "sending email",
            JobStatus::EmailSent => "email sent",
            JobStatus::Failed => "failed",
            JobStatus::ErrorNotified => "error notification email sent",
        }
    }

    /// Check if this is a terminal state (no transition leaves it).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::EmailSent | JobStatus::ErrorNotified)
    }

    /// Check if forward pipeline progress is frozen.
    ///
    /// `failed` is not terminal for the job as a whole (the error notifier
    /// still owns it), but no pipeline stage resumes a failed job.
    pub fn is_failed(&self) -> bool {
        matches!(self, JobStatus::Failed)
    }

    /// The nine-state happy-path sequence, in order.
    pub const HAPPY_PATH: [JobStatus; 9] = [
        JobStatus::Queued,
        JobStatus::ResolvingChannel,
        JobStatus::ChannelResolved,
        JobStatus::FetchingVideos,
        JobStatus::VideosFetched,
        JobStatus::GeneratingTitles,
        JobStatus::TitlesGenerated,
        JobStatus::SendingEmail,
        JobStatus::EmailSent,
    ];
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(JobStatus::Queued.as_str(), "queued");
        assert_eq!(JobStatus::ResolvingChannel.as_str(), "resolving channel");
        assert_eq!(
            JobStatus::ErrorNotified.as_str(),
            "error notification email sent"
        );
    }

    #[test]
    fn test_status_serde_uses_labels() {
        let json = serde_json::to_string(&JobStatus::FetchingVideos).unwrap();
        assert_eq!(json, "\"fetching videos\"");

        let status: JobStatus = serde_json::from_str("\"email sent\"").unwrap();
        assert_eq!(status, JobStatus::EmailSent);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::EmailSent.is_terminal());
        assert!(JobStatus::ErrorNotified.is_terminal());
        assert!(!JobStatus::Failed.is_terminal());
        assert!(JobStatus::Failed.is_failed());
        assert!(!JobStatus::SendingEmail.is_terminal());
    }

    #[test]
    fn test_happy_path_order() {
        assert_eq!(JobStatus::HAPPY_PATH.len(), 9);
        assert_eq!(JobStatus::HAPPY_PATH[0], JobStatus::Queued);
        assert_eq!(JobStatus::HAPPY_PATH[8], JobStatus::EmailSent);
        // No state repeats along the happy path.
        for (i, a) in JobStatus::HAPPY_PATH.iter().enumerate() {
            for b in JobStatus::HAPPY_PATH.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
