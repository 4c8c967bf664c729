//! Caption burn-in boundary.
//!
//! Captions are rendered by an external program invoked as
//! `<captioner> <input> <output>`. Transcription and timing live entirely
//! inside that tool; this wrapper only shells out and checks the exit.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Overlay captions onto `input`, writing the captioned video to `output`.
pub async fn burn_captions(
    captioner: &str,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    which::which(captioner).map_err(|_| MediaError::CaptionerNotFound(captioner.to_string()))?;

    debug!(
        "Running captioner: {} {} {}",
        captioner,
        input.display(),
        output.display()
    );

    let result = Command::new(captioner)
        .arg(input)
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !result.status.success() {
        return Err(MediaError::captioner_failed(
            format!("{} exited with non-zero status", captioner),
            Some(String::from_utf8_lossy(&result.stderr).to_string()),
            result.status.code(),
        ));
    }

    info!("Burned captions into {}", output.display());
    Ok(())
}
