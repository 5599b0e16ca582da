//! Shared request and persistence helpers.

use reqwest::StatusCode;
use serde::Serialize;
use std::path::{Path, PathBuf};
use storyvox_error::{CollaboratorError, CollaboratorErrorKind, CollaboratorResult};
use tracing::debug;

/// A non-success answer from a collaborator service.
#[derive(Debug)]
pub struct Refusal {
    pub status: StatusCode,
    pub body: String,
}

/// POST `body` as JSON and return the response bytes.
///
/// Non-success statuses are returned as [`Refusal`] so callers can map
/// them to their own error kinds.
pub async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    endpoint: &str,
    body: &B,
) -> CollaboratorResult<Result<Vec<u8>, Refusal>> {
    let response = client
        .post(endpoint)
        .json(body)
        .send()
        .await
        .map_err(|e| CollaboratorError::new(CollaboratorErrorKind::Transport(e.to_string())))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, body_len = body.len(), "Collaborator refused request");
        return Ok(Err(Refusal { status, body }));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| CollaboratorError::new(CollaboratorErrorKind::Transport(e.to_string())))?;
    if bytes.is_empty() {
        return Err(CollaboratorError::new(CollaboratorErrorKind::EmptyOutput));
    }

    Ok(Ok(bytes.to_vec()))
}

/// Write `bytes` to `<directory>/<uuid>.<extension>`.
pub async fn persist(
    directory: &Path,
    extension: &str,
    bytes: &[u8],
) -> CollaboratorResult<PathBuf> {
    let io_error =
        |e: std::io::Error| CollaboratorError::new(CollaboratorErrorKind::Io(e.to_string()));

    tokio::fs::create_dir_all(directory).await.map_err(io_error)?;
    let path = directory.join(format!("{}.{}", uuid::Uuid::new_v4(), extension));
    tokio::fs::write(&path, bytes).await.map_err(io_error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Persisted collaborator output");
    Ok(path)
}
