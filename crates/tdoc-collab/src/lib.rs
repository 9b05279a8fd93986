//! External collaborators for the TitleDoctor pipeline.
//!
//! This crate provides:
//! - The collaborator traits the pipeline calls through
//!   ([`ChannelSearch`], [`VideoListing`], [`TitleGenerator`], [`Mailer`])
//! - Reqwest-backed clients for the YouTube Data API, the Gemini
//!   generateContent API and the Resend email API
//!
//! Credentials are read from the environment into [`CollabConfig`]; an
//! absent credential is reported as a configuration fault on each call so
//! the calling stage owns the failure routing.

pub mod config;
pub mod error;
pub mod gemini;
pub mod resend;
pub mod traits;
pub mod youtube;

pub use config::CollabConfig;
pub use error::{CollabError, CollabResult};
pub use gemini::GeminiClient;
pub use resend::ResendClient;
pub use traits::{
    ChannelMatch, ChannelSearch, Mailer, OutboundEmail, SentEmail, TitleGenerator, VideoItem,
    VideoListing,
};
pub use youtube::YouTubeClient;
