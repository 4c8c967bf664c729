//! Job identity and lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Unique identifier for a generation job.
///
/// Ids are supplied by the caller on submission; the scheduler rejects a
/// resubmission while a job with the same id is still in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job lifecycle status.
///
/// Transitions are one-way: `Queued -> Processing -> {Completed, Failed}`.
/// There is no cancellation and no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, waiting for a worker permit
    #[default]
    Queued,
    /// Pipeline is running
    Processing,
    /// Final artifact produced
    Completed,
    /// A pipeline stage failed; the reason lives on the record
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registry entry for one submitted job.
///
/// Lives in the in-memory status registry for the lifetime of the process;
/// records are never evicted (accepted tradeoff, the registry does not
/// survive a restart).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Caller-supplied unique identifier
    pub job_id: JobId,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Error message if the job failed
    pub error_message: Option<String>,
    /// Path of the final artifact once completed
    pub output_path: Option<PathBuf>,
    /// When the job was accepted
    pub submitted_at: DateTime<Utc>,
    /// When the status last changed
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a freshly queued record.
    pub fn queued(job_id: JobId) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            status: JobStatus::Queued,
            error_message: None,
            output_path: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the job as picked up by a worker.
    pub fn start_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.updated_at = Utc::now();
    }

    /// Mark the job as completed with its final artifact path.
    pub fn complete(&mut self, output_path: PathBuf) {
        self.status = JobStatus::Completed;
        self.output_path = Some(output_path);
        self.updated_at = Utc::now();
    }

    /// Mark the job as failed with a reason.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(reason.into());
        self.updated_at = Utc::now();
    }

    /// Public status label, `failed: <reason>` for failures.
    pub fn status_label(&self) -> String {
        match self.status {
            JobStatus::Failed => match &self.error_message {
                Some(msg) => format!("failed: {}", msg),
                None => "failed".to_string(),
            },
            other => other.as_str().to_string(),
        }
    }
}
