//! Ollama-backed [`TextGenerator`].

use async_trait::async_trait;
use ollama_rs::Ollama;
use ollama_rs::generation::completion::request::GenerationRequest as OllamaRequest;
use storyvox_error::{CollaboratorError, CollaboratorErrorKind, CollaboratorResult};
use storyvox_interface::TextGenerator;
use tracing::{debug, info, instrument, warn};

use super::prompt::frame_prompt;

/// Text generator running a local Ollama model.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct OllamaTextGenerator {
    /// Ollama client instance
    #[getter(skip)]
    client: Ollama,

    /// Model name (e.g., "gemma3:4b-it-qat")
    #[getter(skip)]
    model_name: String,

    /// Ollama server URL
    host: String,

    /// Ollama server port
    port: u16,

    /// Instruction framed ahead of every request
    system_prompt: Option<String>,
}

impl OllamaTextGenerator {
    /// Create a generator against the default localhost server.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self::new_with_url(model_name, "http://localhost", 11434)
    }

    /// Create a generator against a custom server.
    #[instrument(name = "ollama_text_generator_new", skip_all)]
    pub fn new_with_url(
        model_name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Self {
        let model_name = model_name.into();
        let host = host.into();

        info!(
            model = %model_name,
            host = %host,
            port,
            "Creating Ollama text generator"
        );

        let client = Ollama::new(host.clone(), port);

        Self {
            client,
            model_name,
            host,
            port,
            system_prompt: None,
        }
    }

    /// Set the system prompt framed ahead of every instruction.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Check the server is reachable and the model is installed.
    #[instrument(skip(self), fields(model = %self.model_name))]
    pub async fn validate(&self) -> CollaboratorResult<()> {
        debug!("Validating Ollama server and model availability");

        match self.client.list_local_models().await {
            Ok(models) => {
                debug!(count = models.len(), "Found local models");

                if !models.iter().any(|m| m.name == self.model_name) {
                    warn!(
                        available = ?models.iter().map(|m| &m.name).collect::<Vec<_>>(),
                        "Model not found locally"
                    );
                    return Err(CollaboratorError::new(CollaboratorErrorKind::Rejected(
                        format!("model '{}' is not installed", self.model_name),
                    )));
                }

                info!("Ollama server and model validated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to connect to Ollama server");
                Err(CollaboratorError::new(CollaboratorErrorKind::Transport(
                    format!("Ollama server not reachable at {}:{}", self.host, self.port),
                )))
            }
        }
    }

    /// Pull the model if it is not installed.
    #[instrument(skip(self), fields(model = %self.model_name))]
    pub async fn ensure_model(&self) -> CollaboratorResult<()> {
        match self.validate().await {
            Ok(()) => {
                debug!("Model already available");
                Ok(())
            }
            Err(e) if matches!(e.kind, CollaboratorErrorKind::Transport(_)) => Err(e),
            Err(_) => {
                info!("Pulling model");

                self.client
                    .pull_model(self.model_name.clone(), false)
                    .await
                    .map_err(|e| {
                        CollaboratorError::new(CollaboratorErrorKind::Rejected(format!(
                            "failed to pull model '{}': {}",
                            self.model_name, e
                        )))
                    })?;

                info!("Model pulled successfully");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaTextGenerator {
    #[instrument(
        skip(self, instruction),
        fields(model = %self.model_name, instruction_len = instruction.len())
    )]
    async fn generate(&self, instruction: &str) -> CollaboratorResult<String> {
        let prompt = frame_prompt(self.system_prompt.as_deref(), instruction);
        debug!(prompt_length = prompt.len(), "Framed prompt");

        let request = OllamaRequest::new(self.model_name.clone(), prompt);
        let response = self.client.generate(request).await.map_err(|e| {
            CollaboratorError::new(CollaboratorErrorKind::Transport(e.to_string()))
        })?;

        let text = response.response.trim().to_string();
        if text.is_empty() {
            warn!("Ollama returned an empty completion");
            return Err(CollaboratorError::new(CollaboratorErrorKind::EmptyOutput));
        }

        debug!(response_length = text.len(), "Received response from Ollama");
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
