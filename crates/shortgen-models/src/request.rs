//! Submission request types.

use serde::{Deserialize, Serialize};

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE: &str = "alloy";

/// Request to generate one short video.
///
/// Every field defaults to empty on the wire so that an absent key is
/// handled by [`validate`](Self::validate) (as a missing-field error)
/// rather than failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Narration text to synthesize
    #[serde(default)]
    pub text: String,
    /// Selector into the background-clip library
    #[serde(default)]
    pub clip_id: String,
    /// Voice identifier for speech synthesis (optional)
    #[serde(default)]
    pub voice: String,
    /// Caller-supplied unique job id
    #[serde(default)]
    pub job_id: String,
}

impl GenerateRequest {
    /// Validate the request.
    ///
    /// `text`, `clip_id` and `job_id` must be non-empty. `voice` is optional
    /// and falls back to [`DEFAULT_VOICE`].
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("text must not be empty".to_string());
        }

        if self.clip_id.trim().is_empty() {
            return Err("clipId must not be empty".to_string());
        }

        if self.job_id.trim().is_empty() {
            return Err("jobId must not be empty".to_string());
        }

        Ok(())
    }

    /// Voice to use, applying the default for an empty selection.
    pub fn voice_or_default(&self) -> &str {
        if self.voice.trim().is_empty() {
            DEFAULT_VOICE
        } else {
            &self.voice
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            text: "hello world".to_string(),
            clip_id: "parkour-1".to_string(),
            voice: String::new(),
            job_id: "job-1".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_empty_required_fields_rejected() {
        let mut r = request();
        r.text = "  ".to_string();
        assert!(r.validate().is_err());

        let mut r = request();
        r.clip_id = String::new();
        assert!(r.validate().is_err());

        let mut r = request();
        r.job_id = String::new();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_voice_defaults() {
        let mut r = request();
        assert_eq!(r.voice_or_default(), DEFAULT_VOICE);
        r.voice = "onyx".to_string();
        assert_eq!(r.voice_or_default(), "onyx");
    }

    #[test]
    fn test_absent_keys_deserialize_empty_and_fail_validation() {
        let r: GenerateRequest =
            serde_json::from_str(r#"{"clipId":"c1","jobId":"j1"}"#).unwrap();
        assert_eq!(r.text, "");
        assert!(r.validate().is_err());

        let r: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let r: GenerateRequest = serde_json::from_str(
            r#"{"text":"hi","clipId":"c1","jobId":"j1"}"#,
        )
        .unwrap();
        assert_eq!(r.clip_id, "c1");
        assert_eq!(r.job_id, "j1");
        assert_eq!(r.voice, "");
    }
}
