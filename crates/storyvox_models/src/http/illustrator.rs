//! HTTP scene illustration.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use storyvox_core::ImageArtifact;
use storyvox_error::{CollaboratorError, CollaboratorErrorKind, CollaboratorResult};
use storyvox_interface::SceneIllustrator;
use tracing::{debug, instrument};

use super::transport::{persist, post_json};

#[derive(Debug, Serialize)]
struct IllustrationRequest<'a> {
    prompt: &'a str,
}

/// Scene illustrator behind an HTTP endpoint.
///
/// Sends `{"prompt": ...}` and stores the returned PNG.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct HttpSceneIllustrator {
    /// Shared HTTP client
    #[getter(skip)]
    client: reqwest::Client,
    /// Illustration endpoint URL
    endpoint: String,
    /// Directory images are written to
    image_dir: PathBuf,
}

impl HttpSceneIllustrator {
    /// Create a new illustrator.
    pub fn new(endpoint: impl Into<String>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            image_dir: image_dir.into(),
        }
    }
}

#[async_trait]
impl SceneIllustrator for HttpSceneIllustrator {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn illustrate(&self, prompt: &str) -> CollaboratorResult<ImageArtifact> {
        let image = post_json(&self.client, &self.endpoint, &IllustrationRequest { prompt })
            .await?
            .map_err(|refusal| {
                CollaboratorError::new(CollaboratorErrorKind::Rejected(format!(
                    "{}: {}",
                    refusal.status,
                    refusal.body.trim()
                )))
            })?;

        let path = persist(&self.image_dir, "png", &image).await?;
        debug!(path = %path.display(), "Illustrated scene");
        Ok(ImageArtifact::new(path))
    }
}
