//! Error types for speech synthesis.

use thiserror::Error;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors that can occur while synthesizing speech.
///
/// All variants are fatal for the owning job; nothing is retried.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The service rejected the input (empty text, unknown voice, ...)
    #[error("Speech input rejected: {0}")]
    Validation(String),

    /// The service answered with a non-success status (quota, auth, 5xx)
    #[error("Speech service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The request never completed (connect failure, timeout)
    #[error("Speech transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Writing the audio artifact failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
