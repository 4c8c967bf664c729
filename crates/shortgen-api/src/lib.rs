//! Axum HTTP API server.
//!
//! Thin wrapper over the engine:
//! - `POST /generate` accepts a job and answers 202 immediately
//! - `GET /status` polls a job's lifecycle state
//! - `GET /health` liveness probe

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
