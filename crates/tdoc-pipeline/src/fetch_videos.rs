//! FetchVideos stage: lists the channel's most recent uploads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use tdoc_bus::EventHandler;
use tdoc_collab::VideoListing;
use tdoc_models::{Event, JobPatch, JobStatus, Topic, VideoSummary};

use crate::error::StageError;
use crate::pipeline::PipelineDeps;
use crate::stage::{run_stage, StageOutcome};

const FALLBACK: &str = "Failed to fetch videos, please try again later.";

/// How many recent uploads one report covers.
const PAGE_SIZE: u8 = 5;

pub struct FetchVideosStage {
    deps: Arc<PipelineDeps>,
    videos: Arc<dyn VideoListing>,
}

impl FetchVideosStage {
    pub fn new(deps: Arc<PipelineDeps>, videos: Arc<dyn VideoListing>) -> Self {
        Self { deps, videos }
    }
}

#[async_trait]
impl EventHandler for FetchVideosStage {
    fn name(&self) -> &'static str {
        "fetch_videos"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::ChannelResolved]
    }

    async fn handle(&self, event: Event) {
        let Event::ChannelResolved {
            job_id,
            email,
            channel_id,
            channel_name,
        } = event
        else {
            debug!(topic = %event.topic(), "Ignoring unexpected event");
            return;
        };

        run_stage(
            &self.deps,
            self.name(),
            &job_id,
            &email,
            JobStatus::FetchingVideos,
            FALLBACK,
            Event::videos_error,
            || async {
                let items = self.videos.list_recent(&channel_id, PAGE_SIZE).await?;

                if items.is_empty() {
                    return Err(StageError::empty("No videos found for this channel"));
                }

                let videos: Vec<VideoSummary> = items
                    .into_iter()
                    .map(|item| VideoSummary {
                        url: VideoSummary::watch_url(&item.video_id),
                        video_id: item.video_id,
                        title: item.title,
                        published_at: item.published_at,
                        thumbnail: item.thumbnail_url,
                    })
                    .collect();

                Ok(StageOutcome {
                    patch: JobPatch::status(JobStatus::VideosFetched).with_videos(videos.clone()),
                    success: Event::VideosFetched {
                        job_id: job_id.clone(),
                        email: email.clone(),
                        channel_name: channel_name.clone(),
                        videos,
                    },
                })
            },
        )
        .await
    }
}
