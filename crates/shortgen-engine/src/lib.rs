//! Job scheduling, pipeline execution and scratch retention.
//!
//! This crate is the core of the shortgen backend:
//! - [`Engine`] accepts submissions and runs each job's pipeline on its
//!   own task, bounded by a concurrency permit
//! - [`StatusRegistry`] is the queryable record of every job's state
//! - [`ArtifactStore`] owns the per-job, per-stage scratch file layout
//! - [`RetentionSweeper`] reclaims stale scratch files on a fixed interval

pub mod artifacts;
pub mod clips;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod scheduler;
pub mod sweeper;

pub use artifacts::{ArtifactStore, Stage};
pub use clips::ClipLibrary;
pub use config::EngineConfig;
pub use error::{EngineError, PipelineError, SubmitError};
pub use registry::StatusRegistry;
pub use scheduler::Engine;
pub use sweeper::{RetentionSweeper, SweepStats};
