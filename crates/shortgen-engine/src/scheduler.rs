//! Job scheduler and executor.
//!
//! Accepts submissions, records them as queued and runs each job's
//! pipeline on its own tokio task. Admission is bounded by a semaphore
//! sized by `max_concurrent_jobs`: accepted jobs wait queued for a permit
//! instead of fanning out without limit. A job's outcome is reported only
//! through the status registry; nothing is retried and no job can affect
//! another or the process.

use std::sync::Arc;
use tracing::{error, info};

use shortgen_models::{GenerateRequest, JobId, JobRecord};
use shortgen_speech::SpeechClient;
use tokio::sync::Semaphore;

use crate::artifacts::ArtifactStore;
use crate::clips::ClipLibrary;
use crate::config::EngineConfig;
use crate::error::{EngineError, SubmitError};
use crate::pipeline::run_pipeline;
use crate::registry::StatusRegistry;

/// The job scheduling and execution engine.
#[derive(Clone)]
pub struct Engine {
    registry: StatusRegistry,
    store: ArtifactStore,
    clips: Arc<ClipLibrary>,
    speech: SpeechClient,
    config: Arc<EngineConfig>,
    permits: Arc<Semaphore>,
}

impl Engine {
    /// Create an engine, preparing the scratch directories.
    pub async fn new(
        config: EngineConfig,
        clips: ClipLibrary,
        speech: SpeechClient,
    ) -> Result<Self, EngineError> {
        let store = ArtifactStore::new(config.work_dir.clone());
        store.ensure_dirs().await?;

        let permits = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));

        Ok(Self {
            registry: StatusRegistry::new(),
            store,
            clips: Arc::new(clips),
            speech,
            config: Arc::new(config),
            permits,
        })
    }

    /// Handle to the status registry.
    pub fn registry(&self) -> &StatusRegistry {
        &self.registry
    }

    /// Handle to the artifact store.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit a generation job.
    ///
    /// Validates the request, records it as queued and schedules the
    /// pipeline fire-and-forget; returns as soon as the job is accepted.
    pub fn submit(&self, request: GenerateRequest) -> Result<(), SubmitError> {
        request.validate().map_err(SubmitError::Invalid)?;

        let job_id = JobId::from_string(request.job_id.clone());

        // Reject id collisions with in-flight jobs: the id is the sole
        // artifact namespacing key, two live jobs sharing it would clobber
        // each other's files.
        self.registry
            .insert_queued(&job_id)
            .map_err(|_: JobRecord| SubmitError::DuplicateJob(job_id.to_string()))?;

        info!(job_id = %job_id, clip_id = %request.clip_id, "Job accepted");

        let engine = self.clone();
        tokio::spawn(async move {
            engine.execute(job_id, request).await;
        });

        Ok(())
    }

    /// Run one job to its terminal state. Never returns an error: every
    /// failure lands in the registry as `failed: <reason>`.
    async fn execute(&self, job_id: JobId, request: GenerateRequest) {
        // Queued until a worker permit frees up.
        let _permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                // Semaphore closed only at shutdown
                self.registry.fail(&job_id, "engine shutting down");
                return;
            }
        };

        self.registry.set_processing(&job_id);
        info!(job_id = %job_id, "Job processing started");

        let result = run_pipeline(
            &job_id,
            &request.text,
            &request.clip_id,
            request.voice_or_default(),
            &self.clips,
            &self.store,
            &self.speech,
            &self.config,
        )
        .await;

        match result {
            Ok(output_path) => {
                info!(job_id = %job_id, "Job completed: {}", output_path.display());
                self.registry.complete(&job_id, output_path);
            }
            Err(e) => {
                error!(job_id = %job_id, "Job failed: {}", e);
                self.registry.fail(&job_id, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortgen_models::JobStatus;
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(job_id: &str) -> GenerateRequest {
        GenerateRequest {
            text: "a test narration".to_string(),
            clip_id: "clip-1".to_string(),
            voice: String::new(),
            job_id: job_id.to_string(),
        }
    }

    async fn engine_with_speech(base_url: &str, work_dir: &std::path::Path) -> Engine {
        let config = EngineConfig {
            work_dir: work_dir.to_path_buf(),
            ..EngineConfig::default()
        };
        let clips = ClipLibrary::from_map(HashMap::from([(
            "clip-1".to_string(),
            work_dir.join("base.mp4"),
        )]));
        let speech = SpeechClient::new(base_url, "test-key", "tts-1");
        Engine::new(config, clips, speech).await.unwrap()
    }

    /// Poll the registry until the job reaches a terminal state.
    async fn wait_terminal(engine: &Engine, job_id: &str) -> shortgen_models::JobRecord {
        for _ in 0..200 {
            if let Some(record) = engine.registry().get(job_id) {
                if record.is_terminal() {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("job {job_id} never reached a terminal state");
    }

    #[tokio::test]
    async fn test_invalid_submission_creates_no_registry_entry() {
        let dir = TempDir::new().unwrap();
        let engine = engine_with_speech("http://127.0.0.1:1", dir.path()).await;

        let mut bad = request("job-empty-text");
        bad.text = String::new();

        assert!(matches!(engine.submit(bad), Err(SubmitError::Invalid(_))));
        assert!(engine.registry().get("job-empty-text").is_none());
    }

    #[tokio::test]
    async fn test_accepted_submission_is_queued_then_terminal() {
        let dir = TempDir::new().unwrap();
        // Unroutable speech service: the job must fail at stage 1, cleanly.
        let engine = engine_with_speech("http://127.0.0.1:1", dir.path()).await;

        engine.submit(request("job-1")).unwrap();

        // Entry exists immediately after submission
        let record = engine.registry().get("job-1").unwrap();
        assert!(matches!(
            record.status,
            JobStatus::Queued | JobStatus::Processing | JobStatus::Failed
        ));

        let record = wait_terminal(&engine, "job-1").await;
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.status_label().starts_with("failed: "));
    }

    #[tokio::test]
    async fn test_speech_service_error_marks_job_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let engine = engine_with_speech(&server.uri(), dir.path()).await;

        engine.submit(request("job-1")).unwrap();

        let record = wait_terminal(&engine, "job-1").await;
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.status_label().contains("Speech"));
    }

    #[tokio::test]
    async fn test_unknown_clip_marks_job_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fake-mp3".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let engine = engine_with_speech(&server.uri(), dir.path()).await;

        let mut req = request("job-1");
        req.clip_id = "no-such-clip".to_string();
        engine.submit(req).unwrap();

        let record = wait_terminal(&engine, "job-1").await;
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.status_label().contains("no-such-clip"));
    }

    #[tokio::test]
    async fn test_duplicate_in_flight_id_rejected() {
        let server = MockServer::start().await;
        // Slow response keeps the first job in flight
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let engine = engine_with_speech(&server.uri(), dir.path()).await;

        engine.submit(request("job-1")).unwrap();
        assert!(matches!(
            engine.submit(request("job-1")),
            Err(SubmitError::DuplicateJob(_))
        ));
    }

    #[tokio::test]
    async fn test_single_permit_keeps_second_job_queued() {
        let server = MockServer::start().await;
        // Slow failure: the first pipeline holds the lone permit long
        // enough to observe the second job waiting.
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let config = EngineConfig {
            work_dir: dir.path().to_path_buf(),
            max_concurrent_jobs: 1,
            ..EngineConfig::default()
        };
        let clips = ClipLibrary::from_map(HashMap::from([(
            "clip-1".to_string(),
            dir.path().join("base.mp4"),
        )]));
        let speech = SpeechClient::new(&server.uri(), "test-key", "tts-1");
        let engine = Engine::new(config, clips, speech).await.unwrap();

        engine.submit(request("job-a")).unwrap();
        engine.submit(request("job-b")).unwrap();

        // Whichever job takes the permit first, the other must sit queued;
        // with one permit they are never processing together.
        let mut observed_one_queued_behind = false;
        for _ in 0..100 {
            let a = engine.registry().get("job-a").unwrap().status;
            let b = engine.registry().get("job-b").unwrap().status;
            assert!(
                !(a == JobStatus::Processing && b == JobStatus::Processing),
                "both jobs processing under a single permit"
            );
            if (a == JobStatus::Processing && b == JobStatus::Queued)
                || (b == JobStatus::Processing && a == JobStatus::Queued)
            {
                observed_one_queued_behind = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(observed_one_queued_behind);

        // The permit recycles and both jobs drain to a terminal state
        assert_eq!(wait_terminal(&engine, "job-a").await.status, JobStatus::Failed);
        assert_eq!(wait_terminal(&engine, "job-b").await.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_concurrent_jobs_have_independent_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let engine = engine_with_speech(&server.uri(), dir.path()).await;

        let ids: Vec<String> = (0..8)
            .map(|_| format!("job-{}", uuid::Uuid::new_v4().simple()))
            .collect();
        for id in &ids {
            engine.submit(request(id)).unwrap();
        }

        for id in &ids {
            let record = wait_terminal(&engine, id).await;
            assert_eq!(record.status, JobStatus::Failed);
            assert_eq!(record.job_id.as_str(), id);
        }
    }
}
