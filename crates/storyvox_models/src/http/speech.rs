//! HTTP speech synthesis.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::path::PathBuf;
use storyvox_core::{Emotion, FragmentLocation};
use storyvox_error::{CollaboratorError, CollaboratorErrorKind, CollaboratorResult};
use storyvox_interface::SpeechSynthesizer;
use tracing::{debug, instrument};

use super::transport::{persist, post_json};

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    emotion: &'a str,
    text: &'a str,
}

/// Speech synthesizer behind an HTTP endpoint.
///
/// Sends `{"emotion": ..., "text": ...}` and stores the returned audio as a
/// fragment file.
///
/// # Examples
///
/// ```
/// use storyvox_models::HttpSpeechSynthesizer;
///
/// let synthesizer = HttpSpeechSynthesizer::new(
///     "http://localhost:50052/synthesize",
///     "output/fragments",
/// );
/// assert_eq!(synthesizer.extension(), "wav");
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct HttpSpeechSynthesizer {
    /// Shared HTTP client
    #[getter(skip)]
    client: reqwest::Client,
    /// Synthesis endpoint URL
    endpoint: String,
    /// Directory fragments are written to
    fragment_dir: PathBuf,
    /// Extension of the returned audio
    extension: String,
}

impl HttpSpeechSynthesizer {
    /// Create a synthesizer that expects WAV audio back.
    pub fn new(endpoint: impl Into<String>, fragment_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            fragment_dir: fragment_dir.into(),
            extension: "wav".to_string(),
        }
    }

    /// Set the extension used for stored fragments.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    #[instrument(skip_all, fields(%emotion, text_len = text.len()))]
    async fn synthesize(
        &self,
        emotion: Emotion,
        text: &str,
    ) -> CollaboratorResult<FragmentLocation> {
        let request = SynthesisRequest {
            emotion: emotion.label(),
            text,
        };

        let audio = match post_json(&self.client, &self.endpoint, &request).await? {
            Ok(audio) => audio,
            Err(refusal)
                if matches!(
                    refusal.status,
                    StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
                ) && refusal.body.to_lowercase().contains(emotion.label()) =>
            {
                return Err(CollaboratorError::new(
                    CollaboratorErrorKind::UnrecognizedEmotion(emotion.to_string()),
                ));
            }
            Err(refusal) => {
                return Err(CollaboratorError::new(CollaboratorErrorKind::Rejected(
                    format!("{}: {}", refusal.status, refusal.body.trim()),
                )));
            }
        };

        let path = persist(&self.fragment_dir, &self.extension, &audio).await?;
        debug!(path = %path.display(), "Synthesized fragment");
        Ok(FragmentLocation::File(path))
    }
}
