//! Generic stage executor.
//!
//! Every forward stage has the same skeleton: persist an in-flight status,
//! do the stage's one piece of work, then persist-and-emit either the
//! success or the failure. The skeleton lives here exactly once; stages
//! supply only their work closure and their labels.

use std::future::Future;

use tracing::{error, info, warn};

use tdoc_models::{Event, Job, JobId, JobPatch, JobStatus};

use crate::error::StageError;
use crate::pipeline::PipelineDeps;

/// What a successful stage attempt produces: the fields to merge onto the
/// job and the success event to publish.
pub(crate) struct StageOutcome {
    pub patch: JobPatch,
    pub success: Event,
}

/// Load the current snapshot, or an empty shell if the store has never
/// seen the job (an event can outrun the initial record).
pub(crate) async fn load_or_shell(deps: &PipelineDeps, job_id: &JobId) -> Result<Job, StageError> {
    Ok(deps
        .store
        .get(job_id)
        .await?
        .unwrap_or_else(|| Job::shell(job_id.clone())))
}

/// Run one stage attempt end to end.
///
/// On success: merges `StageOutcome::patch` onto a fresh snapshot and
/// emits the success event. On any failure: persists `failed` with the raw
/// message for operator diagnosis and emits `error_event` carrying only a
/// user-safe string (`StageError::Empty` messages are user-safe by
/// construction; everything else degrades to `fallback`).
///
/// A job whose snapshot is already failed or terminal is skipped: no stage
/// resumes a frozen job, even under at-least-once redelivery.
pub(crate) async fn run_stage<F, Fut>(
    deps: &PipelineDeps,
    stage: &'static str,
    job_id: &JobId,
    email: &str,
    attempting: JobStatus,
    fallback: &'static str,
    error_event: fn(JobId, String, String) -> Event,
    work: F,
) where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<StageOutcome, StageError>>,
{
    info!(job_id = %job_id, stage, "Stage started");

    let attempt = async {
        let mut job = load_or_shell(deps, job_id).await?;
        if job.status.is_failed() || job.status.is_terminal() {
            return Ok(None);
        }
        job.merge(JobPatch::status(attempting));
        deps.store.set(job_id, job).await?;
        work().await.map(Some)
    }
    .await;

    match attempt {
        Ok(None) => {
            warn!(job_id = %job_id, stage, "Job already failed or terminal, skipping stage");
        }
        Ok(Some(outcome)) => {
            match load_or_shell(deps, job_id).await {
                Ok(mut job) => {
                    job.merge(outcome.patch);
                    if let Err(e) = deps.store.set(job_id, job).await {
                        error!(job_id = %job_id, stage, error = %e, "Failed to persist stage result");
                    }
                }
                Err(e) => {
                    error!(job_id = %job_id, stage, error = %e, "Failed to reload job for stage result");
                }
            }
            info!(job_id = %job_id, stage, "Stage completed");
            if let Err(e) = deps.bus.emit(outcome.success) {
                error!(job_id = %job_id, stage, error = %e, "Failed to emit success event");
            }
        }
        Err(err) => {
            let raw = err.to_string();
            error!(job_id = %job_id, stage, error = %raw, "Stage failed");

            let user_message = match &err {
                StageError::Empty(msg) => msg.clone(),
                _ => fallback.to_string(),
            };

            match load_or_shell(deps, job_id).await {
                Ok(mut job) => {
                    job.merge(JobPatch::status(JobStatus::Failed).with_error(raw));
                    if let Err(e) = deps.store.set(job_id, job).await {
                        error!(job_id = %job_id, stage, error = %e, "Failed to persist failure");
                    }
                }
                Err(e) => {
                    error!(job_id = %job_id, stage, error = %e, "Failed to reload job for failure");
                }
            }

            if let Err(e) = deps.bus.emit(error_event(
                job_id.clone(),
                email.to_string(),
                user_message,
            )) {
                error!(job_id = %job_id, stage, error = %e, "Failed to emit error event");
            }
        }
    }
}
