//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

use shortgen_media::DEFAULT_MAX_AUDIO_SECS;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory for scratch artifacts
    pub work_dir: PathBuf,
    /// Maximum pipelines running at once; further jobs wait queued
    pub max_concurrent_jobs: usize,
    /// Cap on narration audio length in seconds
    pub max_audio_secs: f64,
    /// Interval between retention sweeps
    pub sweep_interval: Duration,
    /// Age beyond which scratch files are reclaimed
    pub retention_max_age: Duration,
    /// External captioner program name
    pub captioner: String,
    /// Background-clip library JSON file
    pub clip_library_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/shortgen"),
            max_concurrent_jobs: 4,
            max_audio_secs: DEFAULT_MAX_AUDIO_SECS,
            sweep_interval: Duration::from_secs(60),
            retention_max_age: Duration::from_secs(600), // 10 minutes
            captioner: "captacity".to_string(),
            clip_library_path: PathBuf::from("clips.json"),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("SHORTGEN_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/shortgen")),
            max_concurrent_jobs: std::env::var("SHORTGEN_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            max_audio_secs: std::env::var("SHORTGEN_MAX_AUDIO_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_AUDIO_SECS),
            sweep_interval: Duration::from_secs(
                std::env::var("SHORTGEN_SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            retention_max_age: Duration::from_secs(
                std::env::var("SHORTGEN_RETENTION_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            captioner: std::env::var("SHORTGEN_CAPTIONER")
                .unwrap_or_else(|_| "captacity".to_string()),
            clip_library_path: std::env::var("SHORTGEN_CLIP_LIBRARY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("clips.json")),
        }
    }
}
