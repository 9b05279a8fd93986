//! Compensation sink: every `*.error` topic converges here.
//!
//! The notifier delivers the single user-visible failure outcome. If the
//! notification dispatch itself fails there is no secondary channel: the
//! fault is logged and swallowed, and the job stays at `sending email`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};

use tdoc_bus::EventHandler;
use tdoc_collab::{Mailer, OutboundEmail};
use tdoc_models::{Event, JobId, JobPatch, JobStatus, Topic};

use crate::error::StageError;
use crate::pipeline::PipelineDeps;
use crate::report::{failure_subject, render_failure_notice};
use crate::stage::load_or_shell;

pub struct ErrorNotifier {
    deps: Arc<PipelineDeps>,
    mailer: Arc<dyn Mailer>,
}

impl ErrorNotifier {
    pub fn new(deps: Arc<PipelineDeps>, mailer: Arc<dyn Mailer>) -> Self {
        Self { deps, mailer }
    }

    async fn notify(&self, job_id: &JobId, email: &str, user_error: &str) -> Result<(), StageError> {
        let mut job = load_or_shell(&self.deps, job_id).await?;
        if job.status.is_terminal() {
            warn!(job_id = %job_id, "Job already terminal, skipping notification");
            return Ok(());
        }
        job.merge(JobPatch::status(JobStatus::SendingEmail));
        self.deps.store.set(job_id, job).await?;

        let sent = self
            .mailer
            .send(OutboundEmail {
                to: email.to_string(),
                subject: failure_subject().to_string(),
                text: render_failure_notice(user_error),
            })
            .await?;

        let mut job = load_or_shell(&self.deps, job_id).await?;
        job.merge(
            JobPatch::status(JobStatus::ErrorNotified)
                .with_email_id(sent.id.clone())
                .with_completed_at(Utc::now()),
        );
        self.deps.store.set(job_id, job).await?;

        info!(job_id = %job_id, email_id = %sent.id, "Error notification email sent");

        self.deps.bus.emit(Event::ErrorNotified {
            job_id: job_id.clone(),
            email: email.to_string(),
            email_id: sent.id,
        })?;

        Ok(())
    }
}

#[async_trait]
impl EventHandler for ErrorNotifier {
    fn name(&self) -> &'static str {
        "error_notifier"
    }

    fn topics(&self) -> &'static [Topic] {
        &Topic::FAILURES
    }

    async fn handle(&self, event: Event) {
        let Some((job_id, email, user_error)) = event.failure_parts() else {
            warn!(topic = %event.topic(), "Ignoring non-error event");
            return;
        };

        info!(job_id = %job_id, topic = %event.topic(), error = user_error, "Handling failure notification");

        // Deliberately bounded failure domain: a failed notification has
        // no escalation path, only a log line.
        if let Err(e) = self.notify(job_id, email, user_error).await {
            error!(job_id = %job_id, error = %e, "Failed to send error notification email");
        }
    }
}
