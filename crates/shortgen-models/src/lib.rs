//! Shared data models for the shortgen backend.

pub mod job;
pub mod request;

pub use job::{JobId, JobRecord, JobStatus};
pub use request::{GenerateRequest, DEFAULT_VOICE};
