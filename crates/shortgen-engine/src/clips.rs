//! Background-clip library.
//!
//! Static mapping from clip selector to a base video path, loaded once at
//! startup from a JSON object (`{"parkour-1": "/clips/parkour-1.mp4", ...}`).
//! Read-only; never mutated by the engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

/// Selector -> base video path mapping.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    clips: HashMap<String, PathBuf>,
}

impl ClipLibrary {
    /// Build a library from an existing mapping.
    pub fn from_map(clips: HashMap<String, PathBuf>) -> Self {
        Self { clips }
    }

    /// Load the library from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            EngineError::ClipLibrary(format!("cannot read {}: {}", path.display(), e))
        })?;

        let clips: HashMap<String, PathBuf> = serde_json::from_str(&raw).map_err(|e| {
            EngineError::ClipLibrary(format!("malformed clip library {}: {}", path.display(), e))
        })?;

        Ok(Self { clips })
    }

    /// Resolve a selector to its base video path.
    pub fn get(&self, clip_id: &str) -> Option<&Path> {
        self.clips.get(clip_id).map(PathBuf::as_path)
    }

    /// Number of registered clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
