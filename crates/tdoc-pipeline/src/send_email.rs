//! SendEmail stage: renders the report and dispatches it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use tdoc_bus::EventHandler;
use tdoc_collab::{Mailer, OutboundEmail};
use tdoc_models::{Event, JobPatch, JobStatus, Topic};

use crate::pipeline::PipelineDeps;
use crate::report::{render_report, report_subject};
use crate::stage::{run_stage, StageOutcome};

const FALLBACK: &str = "Failed to send email.";

pub struct SendEmailStage {
    deps: Arc<PipelineDeps>,
    mailer: Arc<dyn Mailer>,
}

impl SendEmailStage {
    pub fn new(deps: Arc<PipelineDeps>, mailer: Arc<dyn Mailer>) -> Self {
        Self { deps, mailer }
    }
}

#[async_trait]
impl EventHandler for SendEmailStage {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn topics(&self) -> &'static [Topic] {
        &[Topic::TitlesGenerated]
    }

    async fn handle(&self, event: Event) {
        let Event::TitlesGenerated {
            job_id,
            email,
            channel_name,
            improved_titles,
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
            JobStatus::SendingEmail,
            FALLBACK,
            Event::email_error,
            || async {
                let sent = self
                    .mailer
                    .send(OutboundEmail {
                        to: email.clone(),
                        subject: report_subject(&channel_name),
                        text: render_report(&channel_name, &improved_titles),
                    })
                    .await?;

                Ok(StageOutcome {
                    patch: JobPatch::status(JobStatus::EmailSent)
                        .with_email_id(sent.id.clone())
                        .with_completed_at(Utc::now()),
                    success: Event::EmailSent {
                        job_id: job_id.clone(),
                        email: email.clone(),
                        email_id: sent.id,
                    },
                })
            },
        )
        .await
    }
}
