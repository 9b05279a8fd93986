//! Submission handler: accepts a channel + email pair and starts a job.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use tdoc_models::{Event, Job, JobId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /submit` request body.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Channel handle ("@name") or plain channel name
    #[serde(default)]
    #[validate(length(min = 1, message = "channel is required"))]
    pub channel: String,

    /// Destination email address
    #[serde(default)]
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "email format is invalid")
    )]
    pub email: String,
}

/// `POST /submit` response body.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub job_id: JobId,
    pub message: String,
}

/// POST /submit
///
/// Accepts a submission, persists the initial job record at `queued` and
/// emits `job.submitted`.
///
/// Returns:
/// - 202: job accepted, body carries the job ID
/// - 400: missing field or invalid email format
/// - 500: store or bus unavailable
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let job_id = JobId::new();
    let job = Job::new(job_id.clone(), request.channel.clone(), request.email.clone());
    state.store.set(&job_id, job).await?;

    info!(job_id = %job_id, channel = %request.channel, "Job created");

    state.bus.emit(Event::JobSubmitted {
        job_id: job_id.clone(),
        channel: request.channel,
        email: request.email,
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            success: true,
            job_id,
            message: "Your request has been queued. You will get an email soon with improved \
                      title suggestions for your videos."
                .to_string(),
        }),
    ))
}
