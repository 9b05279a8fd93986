//! Keyed job storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use tdoc_models::{Job, JobId};

use crate::error::StoreResult;

/// Keyed persistent record of job progress.
///
/// `get` on an absent key returns `Ok(None)` rather than failing, so a
/// stage can safely merge onto nothing the first time it touches a job.
/// `set` replaces the whole record; callers merge before calling. The
/// store does no partial-field merge and acquires no lock across a
/// read-modify-write, so overlapping writers resolve last-write-wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch the current snapshot for a job, if any.
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>>;

    /// Replace the snapshot for a job.
    async fn set(&self, job_id: &JobId, job: Job) -> StoreResult<()>;
}

/// In-process job store.
///
/// Jobs are partitioned by [`JobId`] and kept for the process lifetime;
/// retention is a policy of the store's operator, not of the pipeline.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs currently held.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no jobs.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }

    async fn set(&self, job_id: &JobId, job: Job) -> StoreResult<()> {
        debug!(job_id = %job_id, status = %job.status, "Storing job snapshot");
        self.jobs.write().await.insert(job_id.clone(), job);
        Ok(())
    }
}
