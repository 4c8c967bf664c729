//! Submission and status-poll handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use shortgen_models::GenerateRequest;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// Always `queued` on acceptance
    pub status: String,
    /// Echo of the caller-supplied job id
    pub job_id: String,
}

/// Query parameters for the status endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "jobId", default)]
    pub job_id: String,
}

/// Status poll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub job_id: String,
    /// `queued`, `processing`, `completed`, `failed: <reason>` or `not found`
    pub status: String,
    /// Final artifact path, present once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

/// POST /generate
///
/// Accept a generation job and return immediately; the pipeline runs in
/// the background and outcomes are observed by polling /status.
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    let job_id = request.job_id.clone();

    state.engine.submit(request)?;

    info!(job_id = %job_id, "Submission accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            status: "queued".to_string(),
            job_id,
        }),
    ))
}

/// GET /status?jobId=...
///
/// Look up a job's lifecycle state. Unknown ids answer with the
/// `not found` sentinel, never an error.
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusResponse>> {
    if query.job_id.trim().is_empty() {
        return Err(ApiError::bad_request("missing jobId"));
    }

    let response = match state.engine.registry().get(&query.job_id) {
        Some(record) => StatusResponse {
            job_id: query.job_id,
            status: record.status_label(),
            output_path: record
                .output_path
                .map(|p| p.to_string_lossy().to_string()),
        },
        None => StatusResponse {
            job_id: query.job_id,
            status: "not found".to_string(),
            output_path: None,
        },
    };

    Ok(Json(response))
}
