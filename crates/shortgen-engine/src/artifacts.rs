//! Filesystem-backed artifact store.
//!
//! Every pipeline stage reads and writes files under the work directory,
//! keyed by `{stage_dir}/{job_id}.{ext}`. The job id is the sole
//! namespacing key, which is why the scheduler refuses duplicate in-flight
//! ids.

use std::path::{Path, PathBuf};
use tokio::fs;

use shortgen_media::remove_file_if_exists;
use shortgen_models::JobId;

/// Pipeline stage, naming one scratch directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Synthesized narration audio
    Voice,
    /// Base clip with narration muxed in
    Voiced,
    /// Voiced clip with captions burned in
    Captioned,
    /// Final deliverable
    Ready,
}

impl Stage {
    /// All stages, in pipeline order.
    pub const ALL: [Stage; 4] = [Stage::Voice, Stage::Voiced, Stage::Captioned, Stage::Ready];

    /// Directory name under the work dir.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Voice => "voices",
            Stage::Voiced => "voiced",
            Stage::Captioned => "captioned",
            Stage::Ready => "ready",
        }
    }

    /// Artifact file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Stage::Voice => "mp3",
            Stage::Voiced | Stage::Captioned | Stage::Ready => "mp4",
        }
    }
}

/// Staging areas for per-job intermediate files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    work_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Root work directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory for one stage.
    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.work_dir.join(stage.dir_name())
    }

    /// All stage directories the retention sweeper scans.
    pub fn sweep_dirs(&self) -> Vec<PathBuf> {
        Stage::ALL.iter().map(|s| self.stage_dir(*s)).collect()
    }

    /// Artifact path for a job at a stage: `{stage_dir}/{job_id}.{ext}`.
    pub fn path(&self, stage: Stage, job_id: &JobId) -> PathBuf {
        self.stage_dir(stage)
            .join(format!("{}.{}", job_id, stage.extension()))
    }

    /// Create every stage directory.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for stage in Stage::ALL {
            fs::create_dir_all(self.stage_dir(stage)).await?;
        }
        Ok(())
    }

    /// Best-effort removal of a job's intermediate artifacts.
    ///
    /// The ready artifact is kept; everything else is scratch once the
    /// final re-mux is done. Each deletion is independently tolerant.
    pub async fn cleanup_intermediates(&self, job_id: &JobId) {
        for stage in [Stage::Voice, Stage::Voiced, Stage::Captioned] {
            remove_file_if_exists(self.path(stage, job_id)).await;
        }
    }
}
