//! Collaborator configuration.

use std::time::Duration;

/// Configuration for the external collaborators.
///
/// Credentials are optional on purpose: a missing key does not prevent the
/// process from starting, it surfaces as a configuration fault the first
/// time the collaborator is called, which routes the owning stage onto its
/// error topic.
#[derive(Debug, Clone)]
pub struct CollabConfig {
    /// YouTube Data API v3 key
    pub youtube_api_key: Option<String>,
    /// Gemini API key
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Resend API key
    pub resend_api_key: Option<String>,
    /// Sender address for outbound email
    pub resend_from_email: Option<String>,
    /// Per-request timeout applied to every collaborator call
    pub request_timeout: Duration,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            resend_api_key: None,
            resend_from_email: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CollabConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: std::env::var("YOUTUBE_API_KEY").ok().filter(|s| !s.is_empty()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            resend_api_key: std::env::var("RESEND_API_KEY").ok().filter(|s| !s.is_empty()),
            resend_from_email: std::env::var("RESEND_FROM_EMAIL")
                .ok()
                .filter(|s| !s.is_empty()),
            request_timeout: Duration::from_secs(
                std::env::var("COLLAB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}
