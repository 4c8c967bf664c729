//! Client for the external speech-synthesis service.
//!
//! Talks to an OpenAI-compatible `/v1/audio/speech` endpoint and streams the
//! returned audio bytes into a voice artifact on scratch storage. Failures
//! split into validation (bad input), service (quota/auth/5xx) and transport
//! (connect/timeout); every one is fatal for the owning job.

pub mod error;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

pub use error::{SpeechError, SpeechResult};

/// Default synthesis model.
pub const DEFAULT_MODEL: &str = "tts-1";

/// Speech synthesis client.
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Synthesis request body.
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
}

impl SpeechClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("SPEECH_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            std::env::var("SPEECH_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .unwrap_or_default(),
            std::env::var("SPEECH_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        )
    }

    /// Synthesize `text` with `voice`, writing the audio to `output`.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &str,
        output: impl AsRef<Path>,
    ) -> SpeechResult<()> {
        let output = output.as_ref();
        let url = format!("{}/v1/audio/speech", self.base_url);

        debug!("Requesting speech synthesis: voice={}", voice);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SpeechRequest {
                model: &self.model,
                input: text,
                voice,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, message));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(output, &bytes).await?;

        info!(
            "Synthesized {} bytes of speech into {}",
            bytes.len(),
            output.display()
        );
        Ok(())
    }
}

/// Map a non-success HTTP status onto the speech error taxonomy.
fn map_error_status(status: StatusCode, message: String) -> SpeechError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            SpeechError::Validation(message)
        }
        _ => SpeechError::Service {
            status: status.as_u16(),
            message,
        },
    }
}
