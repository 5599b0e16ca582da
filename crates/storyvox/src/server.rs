//! HTTP front-end for the pipeline.
//!
//! - `GET /health` reports liveness and whether images are produced
//! - `POST /story-to-audio` runs one storyline through the pipeline

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use storyvox_core::{PipelineResult, SentenceEmotion, StoryRequest};
use storyvox_error::{HttpError, PipelineErrorKind, StoryvoxError, StoryvoxErrorKind, StoryvoxResult};
use storyvox_pipeline::PipelineOrchestrator;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

const SERVICE_NAME: &str = "storyvox";

/// Shared state for request handlers.
///
/// Handlers share one orchestrator; each request is an independent run.
#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<PipelineOrchestrator>,
    shutdown: CancellationToken,
}

impl ApiState {
    /// Create state around an orchestrator.
    pub fn new(orchestrator: Arc<PipelineOrchestrator>) -> Self {
        Self {
            orchestrator,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancel in-flight runs when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

/// Body of a successful `/story-to-audio` response.
#[derive(Debug, Serialize)]
struct StoryResponse {
    status: &'static str,
    story: String,
    sentences: Vec<SentenceEmotion>,
    audio_file_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    image_paths: Vec<String>,
}

impl From<PipelineResult> for StoryResponse {
    fn from(result: PipelineResult) -> Self {
        Self {
            status: "success",
            audio_file_path: result.audio().path.display().to_string(),
            image_paths: result
                .images()
                .iter()
                .map(|image| image.path.display().to_string())
                .collect(),
            story: result.story().clone(),
            sentences: result.sentences().clone(),
        }
    }
}

/// Creates the service router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/story-to-audio", post(story_to_audio))
        .with_state(state)
}

/// Status code a failed run is reported with.
///
/// # Examples
///
/// ```
/// use axum::http::StatusCode;
/// use storyvox::server::status_for;
/// use storyvox::{PipelineError, PipelineErrorKind, SegmentationError, StoryvoxError};
///
/// let invalid = StoryvoxError::from(PipelineError::new(PipelineErrorKind::InvalidRequest("genre")));
/// assert_eq!(status_for(&invalid), StatusCode::UNPROCESSABLE_ENTITY);
///
/// let empty = StoryvoxError::from(SegmentationError::new(120, 0));
/// assert_eq!(status_for(&empty), StatusCode::BAD_GATEWAY);
/// ```
pub fn status_for(err: &StoryvoxError) -> StatusCode {
    match err.kind() {
        StoryvoxErrorKind::Pipeline(e) if matches!(e.kind, PipelineErrorKind::InvalidRequest(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        StoryvoxErrorKind::Upstream(_) | StoryvoxErrorKind::Collaborator(_) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        StoryvoxErrorKind::Segmentation(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({"status": "error", "message": message.into()})),
    )
        .into_response()
}

/// Health check endpoint.
async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "image_service_enabled": state.orchestrator.images_enabled(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Run one storyline.
#[instrument(skip_all)]
async fn story_to_audio(
    State(state): State<ApiState>,
    body: Result<Json<StoryRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected malformed request body");
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text());
        }
    };

    match state
        .orchestrator
        .run_with_cancellation(&request, state.shutdown.child_token())
        .await
    {
        Ok(result) => (StatusCode::OK, Json(StoryResponse::from(result))).into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

/// Serve the API on `addr` until `shutdown` completes.
///
/// # Errors
///
/// Returns an HTTP error if the address cannot be bound or the server fails.
#[instrument(skip(orchestrator, shutdown))]
pub async fn serve(
    orchestrator: Arc<PipelineOrchestrator>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> StoryvoxResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {}: {}", addr, e)))?;

    let runs = CancellationToken::new();
    let router = create_router(ApiState::new(orchestrator).with_shutdown(runs.clone()));

    info!(
        addr = %listener.local_addr().map_err(|e| HttpError::new(e.to_string()))?,
        "Serving storyvox API"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutting down; cancelling in-flight runs");
            runs.cancel();
        })
        .await
        .map_err(|e| HttpError::new(format!("Server error: {}", e)))?;

    Ok(())
}
