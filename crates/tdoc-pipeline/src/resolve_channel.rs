//! ResolveChannel stage: turns a channel handle or name into a channel ID.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use tdoc_bus::EventHandler;
use tdoc_collab::ChannelSearch;
use tdoc_models::{Event, JobPatch, JobStatus, Topic};

use crate::error::StageError;
use crate::pipeline::PipelineDeps;
use crate::stage::{run_stage, StageOutcome};

const FALLBACK: &str = "Failed to resolve channel, please try again later";

pub struct ResolveChannelStage {
    deps: Arc<PipelineDeps>,
    channels: Arc<dyn ChannelSearch>,
}

impl ResolveChannelStage {
    pub fn new(deps: Arc<PipelineDeps>, channels: Arc<dyn ChannelSearch>) -> Self {
        Self { deps, channels }
    }
}

#[async_trait]
impl EventHandler for ResolveChannelStage {
    fn name(&self) -> &'static str {
        "resolve_channel"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::JobSubmitted]
    }

    async fn handle(&self, event: Event) {
        let Event::JobSubmitted {
            job_id,
            channel,
            email,
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
            JobStatus::ResolvingChannel,
            FALLBACK,
            Event::channel_error,
            || async {
                // A "@handle" and a bare name search the same way.
                let query = channel.strip_prefix('@').unwrap_or(&channel);

                let matches = self.channels.search_channel(query).await?;

                // The first match is authoritative.
                let first = matches
                    .into_iter()
                    .next()
                    .ok_or_else(|| StageError::empty("Channel not found"))?;

                Ok(StageOutcome {
                    patch: JobPatch::status(JobStatus::ChannelResolved)
                        .with_channel(first.channel_id.clone(), first.channel_name.clone()),
                    success: Event::ChannelResolved {
                        job_id: job_id.clone(),
                        email: email.clone(),
                        channel_id: first.channel_id,
                        channel_name: first.channel_name,
                    },
                })
            },
        )
        .await
    }
}
