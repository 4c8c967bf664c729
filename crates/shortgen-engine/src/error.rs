//! Engine error types.

use thiserror::Error;

use shortgen_media::MediaError;
use shortgen_speech::SpeechError;

/// Errors surfaced synchronously to the submitter.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field is missing or empty
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// A job with this id is still in flight
    #[error("Job '{0}' is already in flight")]
    DuplicateJob(String),
}

/// Errors that terminate one job's pipeline.
///
/// Every variant ends up as the job's `failed: <message>` status; nothing
/// is retried and nothing escapes the job's own task.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unknown background clip '{0}'")]
    UnknownClip(String),

    #[error("Speech synthesis failed: {0}")]
    Speech(#[from] SpeechError),

    #[error("Media processing failed: {0}")]
    Media(#[from] MediaError),
}

/// Engine startup errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Clip library error: {0}")]
    ClipLibrary(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
