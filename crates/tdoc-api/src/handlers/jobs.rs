//! Job status handler for progress polling.

use axum::extract::{Path, State};
use axum::Json;

use tdoc_models::{Job, JobId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /jobs/:job_id
///
/// Get the current snapshot of a job.
///
/// Returns:
/// - 200: the job record, including status and any stage output so far
/// - 404: unknown job ID
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Job>> {
    let job_id = JobId::from_string(job_id);

    let job = state
        .store
        .get(&job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(job))
}
