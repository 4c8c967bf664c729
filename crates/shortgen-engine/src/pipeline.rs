//! The per-job media pipeline.
//!
//! Stages run strictly sequentially for one job, each consuming the
//! previous stage's artifact:
//!
//! 1. synthesize narration          -> voices/{id}.mp3
//! 2. mux narration onto base clip  -> voiced/{id}.mp4
//! 3. burn captions                 -> captioned/{id}.mp4
//! 4. final re-mux with narration   -> ready/{id}.mp4
//! 5. best-effort intermediate cleanup
//!
//! Any stage error aborts the job; cleanup failures never do.

use std::path::PathBuf;
use tracing::info;

use shortgen_media::{burn_captions, replace_audio};
use shortgen_models::JobId;
use shortgen_speech::SpeechClient;

use crate::artifacts::{ArtifactStore, Stage};
use crate::clips::ClipLibrary;
use crate::config::EngineConfig;
use crate::error::PipelineError;

/// Run the full pipeline for one job, returning the ready artifact path.
pub async fn run_pipeline(
    job_id: &JobId,
    text: &str,
    clip_id: &str,
    voice: &str,
    clips: &ClipLibrary,
    store: &ArtifactStore,
    speech: &SpeechClient,
    config: &EngineConfig,
) -> Result<PathBuf, PipelineError> {
    let voice_path = store.path(Stage::Voice, job_id);
    let voiced_path = store.path(Stage::Voiced, job_id);
    let captioned_path = store.path(Stage::Captioned, job_id);
    let ready_path = store.path(Stage::Ready, job_id);

    // Stage 1: speech synthesis
    speech.synthesize(text, voice, &voice_path).await?;
    info!(job_id = %job_id, "Narration synthesized");

    // Stage 2: mux narration onto the base clip
    let base_clip = clips
        .get(clip_id)
        .ok_or_else(|| PipelineError::UnknownClip(clip_id.to_string()))?
        .to_path_buf();
    replace_audio(&base_clip, &voice_path, &voiced_path, config.max_audio_secs).await?;
    info!(job_id = %job_id, "Narration muxed onto base clip");

    // Stage 3: caption burn-in
    burn_captions(&config.captioner, &voiced_path, &captioned_path).await?;
    info!(job_id = %job_id, "Captions burned in");

    // Stage 4: final re-mux of captioned video with the original narration
    replace_audio(
        &captioned_path,
        &voice_path,
        &ready_path,
        config.max_audio_secs,
    )
    .await?;
    info!(job_id = %job_id, "Final artifact ready: {}", ready_path.display());

    // Stage 5: scratch cleanup, best effort
    store.cleanup_intermediates(job_id).await;

    Ok(ready_path)
}
