//! Scripted collaborators and a status-recording store for pipeline tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use tdoc_bus::EventHandler;
use tdoc_collab::{
    ChannelMatch, ChannelSearch, CollabError, CollabResult, Mailer, OutboundEmail, SentEmail,
    TitleGenerator, VideoItem, VideoListing,
};
use tdoc_models::{Event, Job, JobId, JobStatus, Topic};
use tdoc_store::{JobStore, MemoryJobStore, StoreResult};

/// Store wrapper that records every status written, in write order.
pub struct RecordingStore {
    inner: MemoryJobStore,
    statuses: Mutex<Vec<JobStatus>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryJobStore::new(),
            statuses: Mutex::new(Vec::new()),
        }
    }

    pub async fn statuses(&self) -> Vec<JobStatus> {
        self.statuses.lock().await.clone()
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        self.inner.get(job_id).await
    }

    async fn set(&self, job_id: &JobId, job: Job) -> StoreResult<()> {
        self.statuses.lock().await.push(job.status);
        self.inner.set(job_id, job).await
    }
}

/// Channel search with a fixed result.
pub struct FakeChannels {
    pub matches: Vec<ChannelMatch>,
}

#[async_trait]
impl ChannelSearch for FakeChannels {
    async fn search_channel(&self, _query: &str) -> CollabResult<Vec<ChannelMatch>> {
        Ok(self.matches.clone())
    }
}

/// Video listing with a fixed result.
pub struct FakeVideos {
    pub items: Vec<VideoItem>,
}

#[async_trait]
impl VideoListing for FakeVideos {
    async fn list_recent(&self, _channel_id: &str, limit: u8) -> CollabResult<Vec<VideoItem>> {
        Ok(self.items.iter().take(limit as usize).cloned().collect())
    }
}

/// Title generator that replies with a fixed raw text.
pub struct FakeTitles {
    pub raw: String,
}

#[async_trait]
impl TitleGenerator for FakeTitles {
    async fn generate(&self, _prompt: &str) -> CollabResult<String> {
        Ok(self.raw.clone())
    }
}

/// Mailer that records every dispatch and can be scripted to fail.
pub struct FakeMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub attempt_tx: Option<mpsc::UnboundedSender<()>>,
}

impl FakeMailer {
    pub fn working() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
            attempt_tx: None,
        }
    }

    pub fn failing(attempt_tx: mpsc::UnboundedSender<()>) -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
            attempt_tx: Some(attempt_tx),
        }
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: OutboundEmail) -> CollabResult<SentEmail> {
        self.sent.lock().await.push(email);
        if let Some(tx) = &self.attempt_tx {
            tx.send(()).ok();
        }
        if self.fail {
            return Err(CollabError::api("Resend API error: scripted failure"));
        }
        Ok(SentEmail { id: "re_test".into() })
    }
}

/// Forwards terminal events to the test body.
pub struct TerminalProbe {
    pub tx: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl EventHandler for TerminalProbe {
    fn name(&self) -> &'static str {
        "terminal_probe"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::EmailSent, Topic::ErrorNotified]
    }

    async fn handle(&self, event: Event) {
        self.tx.send(event).ok();
    }
}

/// Build `count` listing items named `Video number N`.
pub fn sample_items(count: usize) -> Vec<VideoItem> {
    (0..count)
        .map(|i| VideoItem {
            video_id: format!("v{}", i + 1),
            title: format!("Video number {}", i + 1),
            published_at: Utc::now(),
            thumbnail_url: format!("https://i.ytimg.com/vi/v{}/default.jpg", i + 1),
        })
        .collect()
}

/// A well-formed model reply aligned with `sample_items(count)`.
pub fn aligned_titles_json(count: usize) -> String {
    let entries = (0..count)
        .map(|i| {
            format!(
                r#"{{"original": "Video number {n}", "improved": "Improved number {n}", "rationale": "Sharper hook {n}"}}"#,
                n = i + 1
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"titles": [{}]}}"#, entries)
}

/// One channel match for the happy path.
pub fn one_match() -> Vec<ChannelMatch> {
    vec![ChannelMatch {
        channel_id: "UC123".into(),
        channel_name: "My Channel".into(),
    }]
}
