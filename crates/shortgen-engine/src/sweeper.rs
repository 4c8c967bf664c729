//! Scratch retention sweeper.
//!
//! Long-lived background task that reclaims disk space from stale
//! artifacts. Stateless between cycles: every pass re-scans each stage
//! directory and deletes immediate files whose mtime age exceeds the
//! retention threshold, sparing files whose stem is an in-flight job id.
//! Per-file errors never abort a cycle.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::registry::StatusRegistry;

/// Outcome of one sweep cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Files inspected
    pub total: usize,
    /// Files deleted
    pub deleted: usize,
    /// Files spared because their job is still in flight
    pub spared_active: usize,
}

/// Background retention sweeper.
pub struct RetentionSweeper {
    dirs: Vec<PathBuf>,
    registry: StatusRegistry,
    interval: Duration,
    max_age: Duration,
}

impl RetentionSweeper {
    /// Create a sweeper over the given scratch directories.
    pub fn new(
        dirs: Vec<PathBuf>,
        registry: StatusRegistry,
        interval: Duration,
        max_age: Duration,
    ) -> Self {
        Self {
            dirs,
            registry,
            interval,
            max_age,
        }
    }

    /// Run forever on the configured interval.
    ///
    /// Spawn this as a background task; it has no ordering relationship
    /// to any job's lifecycle.
    pub async fn run(&self) {
        info!(
            "Starting retention sweeper (interval {:?}, max age {:?})",
            self.interval, self.max_age
        );

        let mut ticker = interval(self.interval);

        loop {
            ticker.tick().await;

            match self.sweep_once().await {
                Ok(stats) => {
                    if stats.total > 0 {
                        info!(
                            "Sweep cycle complete: {}/{} files deleted, {} active spared",
                            stats.deleted, stats.total, stats.spared_active
                        );
                    }
                }
                Err(e) => error!("Sweep cycle error: {}", e),
            }
        }
    }

    /// Run a single sweep cycle across every directory.
    pub async fn sweep_once(&self) -> std::io::Result<SweepStats> {
        let mut stats = SweepStats::default();
        let now = SystemTime::now();

        for dir in &self.dirs {
            // Missing directories are created, not errors.
            if !dir.exists() {
                warn!("Scratch directory {} missing, creating it", dir.display());
                fs::create_dir_all(dir).await?;
                continue;
            }

            self.sweep_dir(dir, now, &mut stats).await;
        }

        Ok(stats)
    }

    /// Sweep one directory, tolerating every per-file failure.
    async fn sweep_dir(&self, dir: &Path, now: SystemTime, stats: &mut SweepStats) {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot scan {}: {}", dir.display(), e);
                return;
            }
        };

        // Files may disappear between the scan and the stat; treat every
        // per-file error as "skip".
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(_) => continue,
            };

            stats.total += 1;

            let age = metadata
                .modified()
                .ok()
                .and_then(|mtime| now.duration_since(mtime).ok())
                .unwrap_or(Duration::ZERO);

            if age <= self.max_age {
                continue;
            }

            if let Some(job_id) = file_job_id(&path) {
                if self.registry.is_active(&job_id) {
                    debug!(
                        "Sparing {} (job {} still in flight)",
                        path.display(),
                        job_id
                    );
                    stats.spared_active += 1;
                    continue;
                }
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    info!("Deleted stale scratch file {}", path.display());
                    stats.deleted += 1;
                }
                Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
            }
        }
    }
}

/// Job id a scratch file belongs to, by the `{job_id}.{ext}` convention.
fn file_job_id(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}
