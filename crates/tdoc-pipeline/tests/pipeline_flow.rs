//! End-to-end pipeline flows over the real bus and an in-memory store,
//! with scripted collaborators.

mod support;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use tdoc_bus::{EventBus, SubscriberRegistry};
use tdoc_models::{Event, Job, JobId, JobStatus, Topic};
use tdoc_pipeline::{attach, Collaborators};
use tdoc_store::JobStore;

use support::{
    aligned_titles_json, one_match, sample_items, FakeChannels, FakeMailer, FakeTitles,
    FakeVideos, RecordingStore, TerminalProbe,
};

struct Harness {
    store: Arc<RecordingStore>,
    bus: EventBus,
    mailer: Arc<FakeMailer>,
    terminal_rx: mpsc::UnboundedReceiver<Event>,
}

fn spawn_pipeline(
    channels: FakeChannels,
    videos: FakeVideos,
    titles: FakeTitles,
    mailer: FakeMailer,
) -> Harness {
    let store = Arc::new(RecordingStore::new());
    let mailer = Arc::new(mailer);
    let (bus, mut registry): (EventBus, SubscriberRegistry) = EventBus::channel();

    let shared_store: Arc<dyn JobStore> = store.clone();
    let shared_mailer: Arc<dyn tdoc_collab::Mailer> = mailer.clone();
    attach(
        &mut registry,
        shared_store,
        bus.clone(),
        Collaborators {
            channels: Arc::new(channels),
            videos: Arc::new(videos),
            titles: Arc::new(titles),
            mailer: shared_mailer,
        },
    );

    let (terminal_tx, terminal_rx) = mpsc::unbounded_channel();
    registry.subscribe(Arc::new(TerminalProbe { tx: terminal_tx }));
    tokio::spawn(registry.run());

    Harness {
        store,
        bus,
        mailer,
        terminal_rx,
    }
}

/// Act as the submission entry point: persist the initial record and emit
/// `job.submitted`.
async fn submit(harness: &Harness, job_id: &JobId, channel: &str, email: &str) {
    let job = Job::new(job_id.clone(), channel, email);
    harness.store.set(job_id, job).await.unwrap();
    harness
        .bus
        .emit(Event::JobSubmitted {
            job_id: job_id.clone(),
            channel: channel.to_string(),
            email: email.to_string(),
        })
        .unwrap();
}

async fn await_terminal(harness: &mut Harness) -> Event {
    timeout(Duration::from_secs(5), harness.terminal_rx.recv())
        .await
        .expect("pipeline reached no terminal event")
        .expect("probe channel closed")
}

#[tokio::test]
async fn test_happy_path_reaches_email_sent() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: one_match() },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: aligned_titles_json(5) },
        FakeMailer::working(),
    );

    let job_id = JobId::from_string("job-happy");
    submit(&harness, &job_id, "@MyChannel", "a@b.com").await;

    let terminal = await_terminal(&mut harness).await;
    assert_eq!(terminal.topic(), Topic::EmailSent);

    let job = harness.store.get(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::EmailSent);
    assert_eq!(job.email_id.as_deref(), Some("re_test"));
    assert_eq!(job.channel_id.as_deref(), Some("UC123"));
    assert_eq!(job.videos.as_ref().map(Vec::len), Some(5));
    assert_eq!(job.improved_titles.as_ref().map(Vec::len), Some(5));
    assert!(job.completed_at.is_some());
    assert!(job.error.is_none());

    // The nine-state sequence, no skipped or repeated state.
    assert_eq!(harness.store.statuses().await, JobStatus::HAPPY_PATH);
}

#[tokio::test]
async fn test_report_email_round_trips_titles() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: one_match() },
        FakeVideos { items: sample_items(2) },
        FakeTitles { raw: aligned_titles_json(2) },
        FakeMailer::working(),
    );

    let job_id = JobId::from_string("job-roundtrip");
    submit(&harness, &job_id, "MyChannel", "a@b.com").await;
    await_terminal(&mut harness).await;

    let sent = harness.mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.to, "a@b.com");
    assert_eq!(email.subject, "Improved YouTube Titles for \"My Channel\"");

    // Every field of every suggestion survives into the report, in order.
    for n in 1..=2 {
        assert!(email.text.contains(&format!("Original Title: Video number {}", n)));
        assert!(email.text.contains(&format!("Improved Title: Improved number {}", n)));
        assert!(email.text.contains(&format!("Why: Sharper hook {}", n)));
        assert!(email
            .text
            .contains(&format!("Video URL: https://www.youtube.com/watch?v=v{}", n)));
    }
    let first = email.text.find("Improved number 1").unwrap();
    let second = email.text.find("Improved number 2").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_zero_matches_ends_in_error_notification() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: vec![] },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: aligned_titles_json(5) },
        FakeMailer::working(),
    );

    let job_id = JobId::from_string("job-nochannel");
    submit(&harness, &job_id, "@nobody", "a@b.com").await;

    let terminal = await_terminal(&mut harness).await;
    assert_eq!(terminal.topic(), Topic::ErrorNotified);

    let job = harness.store.get(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::ErrorNotified);
    assert_eq!(job.error.as_deref(), Some("Channel not found"));
    assert_eq!(job.email_id.as_deref(), Some("re_test"));
    assert!(job.channel_id.is_none());

    assert_eq!(
        harness.store.statuses().await,
        vec![
            JobStatus::Queued,
            JobStatus::ResolvingChannel,
            JobStatus::Failed,
            JobStatus::SendingEmail,
            JobStatus::ErrorNotified,
        ]
    );

    let sent = harness.mailer.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Request failed for TitleDoctor");
    assert!(sent[0].text.contains("Channel not found"));
}

#[tokio::test]
async fn test_malformed_model_reply_keeps_videos() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: one_match() },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: "this is not json".into() },
        FakeMailer::working(),
    );

    let job_id = JobId::from_string("job-badmodel");
    submit(&harness, &job_id, "@MyChannel", "a@b.com").await;

    let terminal = await_terminal(&mut harness).await;
    assert_eq!(terminal.topic(), Topic::ErrorNotified);

    let job = harness.store.get(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::ErrorNotified);
    // Partial data preservation: the fetched videos survive the failure,
    // the titles field is never set.
    assert_eq!(job.videos.as_ref().map(Vec::len), Some(5));
    assert!(job.improved_titles.is_none());
    assert!(job
        .error
        .as_deref()
        .unwrap()
        .contains("titles JSON did not parse"));

    // The user sees the generic message, not the parse error.
    let sent = harness.mailer.sent.lock().await;
    assert!(sent[0]
        .text
        .contains("Failed to generate titles, please try again later."));
    assert!(!sent[0].text.contains("did not parse"));
}

#[tokio::test]
async fn test_misaligned_model_reply_is_a_stage_failure() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: one_match() },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: aligned_titles_json(3) },
        FakeMailer::working(),
    );

    let job_id = JobId::from_string("job-misaligned");
    submit(&harness, &job_id, "@MyChannel", "a@b.com").await;

    let terminal = await_terminal(&mut harness).await;
    assert_eq!(terminal.topic(), Topic::ErrorNotified);

    let job = harness.store.get(&job_id).await.unwrap().unwrap();
    assert!(job.improved_titles.is_none());
    assert!(job.error.as_deref().unwrap().contains("expected 5"));
}

#[tokio::test]
async fn test_notification_fault_is_swallowed() {
    let (attempt_tx, mut attempt_rx) = mpsc::unbounded_channel();
    let mut harness = spawn_pipeline(
        FakeChannels { matches: vec![] },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: aligned_titles_json(5) },
        FakeMailer::failing(attempt_tx),
    );

    let job_id = JobId::from_string("job-deadend");
    submit(&harness, &job_id, "@nobody", "a@b.com").await;

    // The notifier attempts the dispatch...
    timeout(Duration::from_secs(5), attempt_rx.recv())
        .await
        .expect("notifier never attempted dispatch")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // ...but nothing escalates: no terminal event, the job stalls at
    // `sending email` with the failure preserved.
    assert!(harness.terminal_rx.try_recv().is_err());
    let job = harness.store.get(&job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::SendingEmail);
    assert_eq!(job.error.as_deref(), Some("Channel not found"));
    assert!(job.email_id.is_none());
}

#[tokio::test]
async fn test_concurrent_jobs_do_not_interfere() {
    let mut harness = spawn_pipeline(
        FakeChannels { matches: one_match() },
        FakeVideos { items: sample_items(5) },
        FakeTitles { raw: aligned_titles_json(5) },
        FakeMailer::working(),
    );

    let first = JobId::from_string("job-a");
    let second = JobId::from_string("job-b");
    submit(&harness, &first, "@MyChannel", "a@b.com").await;
    submit(&harness, &second, "@MyChannel", "b@b.com").await;

    await_terminal(&mut harness).await;
    await_terminal(&mut harness).await;

    for job_id in [&first, &second] {
        let job = harness.store.get(job_id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::EmailSent);
        assert_eq!(job.improved_titles.as_ref().map(Vec::len), Some(5));
    }
    assert_eq!(harness.mailer.sent.lock().await.len(), 2);
}
