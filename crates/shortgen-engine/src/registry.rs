//! In-memory job status registry.
//!
//! The authoritative record of every job's lifecycle state. Owned by the
//! engine, shared as a cloneable handle with the API layer (readers) and
//! each job's own task (its single writer). Records live for the process
//! lifetime; the registry is not persisted and never evicted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use shortgen_models::{JobId, JobRecord};

/// Shared, thread-safe job id -> record table.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    inner: Arc<RwLock<HashMap<String, JobRecord>>>,
}

impl StatusRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly queued record.
    ///
    /// Fails when a record with the same id is still in flight; a terminal
    /// id may be reused (its artifacts are final or already swept).
    pub fn insert_queued(&self, job_id: &JobId) -> Result<(), JobRecord> {
        let mut map = self.inner.write().expect("registry lock poisoned");

        if let Some(existing) = map.get(job_id.as_str()) {
            if !existing.is_terminal() {
                return Err(existing.clone());
            }
        }

        map.insert(job_id.as_str().to_string(), JobRecord::queued(job_id.clone()));
        Ok(())
    }

    /// Mark a job as picked up by a worker.
    pub fn set_processing(&self, job_id: &JobId) {
        let mut map = self.inner.write().expect("registry lock poisoned");
        if let Some(record) = map.get_mut(job_id.as_str()) {
            record.start_processing();
        }
    }

    /// Mark a job as completed with its final artifact path.
    pub fn complete(&self, job_id: &JobId, output_path: PathBuf) {
        let mut map = self.inner.write().expect("registry lock poisoned");
        if let Some(record) = map.get_mut(job_id.as_str()) {
            record.complete(output_path);
        }
    }

    /// Mark a job as failed with a reason.
    pub fn fail(&self, job_id: &JobId, reason: impl Into<String>) {
        let mut map = self.inner.write().expect("registry lock poisoned");
        if let Some(record) = map.get_mut(job_id.as_str()) {
            record.fail(reason);
        }
    }

    /// Look up a job. Unknown ids are `None`, never an error.
    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        let map = self.inner.read().expect("registry lock poisoned");
        map.get(job_id).cloned()
    }

    /// Whether a job with this id exists and is not terminal.
    ///
    /// The retention sweeper uses this to spare scratch files that still
    /// belong to an in-flight job.
    pub fn is_active(&self, job_id: &str) -> bool {
        let map = self.inner.read().expect("registry lock poisoned");
        map.get(job_id).map(|r| !r.is_terminal()).unwrap_or(false)
    }

    /// Number of records (for logging).
    pub fn len(&self) -> usize {
        self.inner.read().expect("registry lock poisoned").len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
