//! API routes.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{generate, health, status};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(generate))
        .route("/status", get(status))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use shortgen_engine::{ClipLibrary, Engine, EngineConfig};
    use shortgen_speech::SpeechClient;

    use crate::config::ApiConfig;

    async fn test_state(dir: &TempDir) -> AppState {
        let engine_config = EngineConfig {
            work_dir: dir.path().to_path_buf(),
            ..EngineConfig::default()
        };
        let clips = ClipLibrary::from_map(HashMap::from([(
            "clip-1".to_string(),
            dir.path().join("base.mp4"),
        )]));
        // Unroutable speech service: accepted jobs fail in the background,
        // which is enough to exercise the submission contract.
        let speech = SpeechClient::new("http://127.0.0.1:1", "k", "tts-1");
        let engine = Engine::new(engine_config, clips, speech).await.unwrap();

        AppState {
            config: ApiConfig::default(),
            engine: Arc::new(engine),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    async fn test_generate_accepts_and_status_tracks() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"text":"hi","clipId":"clip-1","voice":"alloy","jobId":"job-1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = body_json(response).await;
        assert_eq!(json["status"], "queued");
        assert_eq!(json["jobId"], "job-1");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/status?jobId=job-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["jobId"], "job-1");
        // The job is live or already failed against the unroutable
        // speech service; it must never be unknown.
        assert_ne!(json["status"], "not found");
    }

    #[tokio::test]
    async fn test_generate_missing_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"","clipId":"clip-1","jobId":"job-x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // An absent key is the same contract as an empty one: 400, not a
        // deserialization error.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"clipId":"clip-1","jobId":"job-x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Rejected before any registry entry: status still answers not found
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/status?jobId=job-x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "not found");
    }

    #[tokio::test]
    async fn test_status_unknown_job_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/status?jobId=missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "not found");
    }

    #[tokio::test]
    async fn test_status_requires_job_id() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let response = app
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_submission_conflicts() {
        let dir = TempDir::new().unwrap();
        let app = create_router(test_state(&dir).await);

        let submit = |app: Router| async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"text":"hi","clipId":"clip-1","jobId":"dup-1"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap()
        };

        let first = submit(app.clone()).await;
        assert_eq!(first.status(), StatusCode::ACCEPTED);

        let second = submit(app).await;
        // Either still in flight (conflict) or already failed and
        // resubmittable; with the unroutable speech endpoint the first job
        // usually lives long enough to collide.
        assert!(
            second.status() == StatusCode::CONFLICT
                || second.status() == StatusCode::ACCEPTED
        );
    }
}
