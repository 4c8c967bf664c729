//! Application state.

use std::sync::Arc;

use shortgen_engine::{ClipLibrary, Engine, EngineConfig};
use shortgen_speech::SpeechClient;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let engine_config = EngineConfig::from_env();
        let clips = ClipLibrary::load(&engine_config.clip_library_path).await?;
        let speech = SpeechClient::from_env();

        let engine = Engine::new(engine_config, clips, speech).await?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }
}
