//! Copy-codec audio/video muxing with the duration-cap policy.
//!
//! Replaces the audio track of a base video with a synthesized narration
//! track. Video is never re-encoded: the video stream is mapped from the
//! first input and the audio stream from the second, both stream-copied.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};
use crate::fs::remove_file_if_exists;
use crate::probe::duration_or_zero;

/// Default cap on narration audio length, in seconds.
pub const DEFAULT_MAX_AUDIO_SECS: f64 = 120.0;

/// Duration decisions for one mux operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MuxPlan {
    /// Probed narration duration
    pub audio_duration: f64,
    /// Probed base video duration
    pub video_duration: f64,
    /// Narration duration after applying the cap
    pub final_audio_duration: f64,
    /// Whether the narration must be trimmed to the cap first
    pub trim_audio: bool,
    /// `-t` limit for the mux output, when capped audio is shorter
    /// than the video
    pub output_limit: Option<f64>,
}

/// Compute the duration policy for a mux.
///
/// Output duration is the minimum of (capped audio duration, video
/// duration). The limit is only passed to ffmpeg when the capped audio is
/// strictly shorter than the video, matching the truncate-video-to-audio
/// behavior.
pub fn plan_mux(audio_duration: f64, video_duration: f64, max_audio_secs: f64) -> MuxPlan {
    let trim_audio = audio_duration > max_audio_secs;
    let final_audio_duration = audio_duration.min(max_audio_secs);

    let output_limit = if final_audio_duration < video_duration {
        Some(final_audio_duration)
    } else {
        None
    };

    MuxPlan {
        audio_duration,
        video_duration,
        final_audio_duration,
        trim_audio,
        output_limit,
    }
}

/// Build the ffmpeg argument list for the stream-copy mux.
pub fn build_mux_args(
    video: &Path,
    audio: &Path,
    output: &Path,
    output_limit: Option<f64>,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        video.to_string_lossy().to_string(),
        "-i".to_string(),
        audio.to_string_lossy().to_string(),
        // Video stream from the first input, audio from the second
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
    ];

    if let Some(limit) = output_limit {
        args.push("-t".to_string());
        args.push(format!("{:.3}", limit));
    }

    args.push(output.to_string_lossy().to_string());
    args
}

/// Replace the audio track of `video` with `audio`, writing `output`.
///
/// Narration longer than `max_audio_secs` is first trimmed to the cap with a
/// copy-codec pass through a job-scoped temporary file, deleted after use.
/// Probe failures degrade to zero durations; a non-zero ffmpeg exit is a
/// hard error.
pub async fn replace_audio(
    video: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    output: impl AsRef<Path>,
    max_audio_secs: f64,
) -> MediaResult<()> {
    let video = video.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let audio_duration = duration_or_zero(audio).await;
    let video_duration = duration_or_zero(video).await;
    let plan = plan_mux(audio_duration, video_duration, max_audio_secs);

    debug!(
        "Mux plan for {}: audio {:.2}s, video {:.2}s, limit {:?}",
        output.display(),
        plan.audio_duration,
        plan.video_duration,
        plan.output_limit
    );

    let mux_audio = if plan.trim_audio {
        let trimmed = trimmed_audio_path(audio);
        trim_audio_copy(audio, &trimmed, max_audio_secs).await?;
        info!(
            "Trimmed narration to {:.0}s cap: {}",
            max_audio_secs,
            trimmed.display()
        );
        trimmed
    } else {
        audio.to_path_buf()
    };

    let args = build_mux_args(video, &mux_audio, output, plan.output_limit);
    let result = run_ffmpeg(&args).await;

    // The trimmed temporary is job-scoped; drop it regardless of outcome.
    if plan.trim_audio {
        remove_file_if_exists(&mux_audio).await;
    }

    result?;

    info!("Created video with replaced audio: {}", output.display());
    Ok(())
}

/// Sibling path for the trimmed narration temporary, scoped by the source
/// file name so concurrent jobs never share it.
fn trimmed_audio_path(audio: &Path) -> PathBuf {
    let stem = audio
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "audio".to_string());
    let ext = audio
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp3".to_string());
    audio.with_file_name(format!("{}.trimmed.{}", stem, ext))
}

/// Trim audio to `max_secs` without re-encoding.
async fn trim_audio_copy(audio: &Path, trimmed: &Path, max_secs: f64) -> MediaResult<()> {
    let args = vec![
        "-y".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        audio.to_string_lossy().to_string(),
        "-t".to_string(),
        format!("{:.3}", max_secs),
        "-c:a".to_string(),
        "copy".to_string(),
        trimmed.to_string_lossy().to_string(),
    ];
    run_ffmpeg(&args).await
}

/// Run ffmpeg with the given args, mapping a non-zero exit to an error.
async fn run_ffmpeg(args: &[String]) -> MediaResult<()> {
    debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

    let output = Command::new("ffmpeg")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if output.status.success() {
        Ok(())
    } else {
        Err(MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ))
    }
}
