//! FFmpeg/captioner CLI wrapper for the shortgen pipeline.
//!
//! This crate provides:
//! - Duration probing via ffprobe (with soft-failure degradation)
//! - Copy-codec audio replacement with the narration duration cap
//! - Caption burn-in through an external captioner program
//! - Best-effort scratch file removal

pub mod captions;
pub mod error;
pub mod fs;
pub mod mux;
pub mod probe;

pub use captions::burn_captions;
pub use error::{MediaError, MediaResult};
pub use fs::remove_file_if_exists;
pub use mux::{build_mux_args, plan_mux, replace_audio, MuxPlan, DEFAULT_MAX_AUDIO_SECS};
pub use probe::{duration_or_zero, probe_duration};
