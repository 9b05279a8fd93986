//! GenerateTitles stage: asks the model for improved titles.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use tdoc_bus::EventHandler;
use tdoc_collab::TitleGenerator;
use tdoc_models::{Event, JobPatch, JobStatus, Topic};

use crate::pipeline::PipelineDeps;
use crate::prompt::{build_prompt, parse_titles};
use crate::stage::{run_stage, StageOutcome};

const FALLBACK: &str = "Failed to generate titles, please try again later.";

pub struct GenerateTitlesStage {
    deps: Arc<PipelineDeps>,
    titles: Arc<dyn TitleGenerator>,
}

impl GenerateTitlesStage {
    pub fn new(deps: Arc<PipelineDeps>, titles: Arc<dyn TitleGenerator>) -> Self {
        Self { deps, titles }
    }
}

#[async_trait]
impl EventHandler for GenerateTitlesStage {
    fn name(&self) -> &'static str {
        "generate_titles"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::VideosFetched]
    }

    async fn handle(&self, event: Event) {
        let Event::VideosFetched {
            job_id,
            email,
            channel_name,
            videos,
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
            JobStatus::GeneratingTitles,
            FALLBACK,
            Event::titles_error,
            || async {
                let prompt = build_prompt(&channel_name, &videos);
                let raw = self.titles.generate(&prompt).await?;
                let improved_titles = parse_titles(&raw, &videos)?;

                Ok(StageOutcome {
                    patch: JobPatch::status(JobStatus::TitlesGenerated)
                        .with_improved_titles(improved_titles.clone()),
                    success: Event::TitlesGenerated {
                        job_id: job_id.clone(),
                        email: email.clone(),
                        channel_name: channel_name.clone(),
                        improved_titles,
                    },
                })
            },
        )
        .await
    }
}
