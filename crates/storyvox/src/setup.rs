//! Wiring configured collaborators into an orchestrator.

use std::sync::Arc;

use storyvox_error::StoryvoxResult;
use storyvox_interface::SceneIllustrator;
use storyvox_models::{HttpSceneIllustrator, HttpSpeechSynthesizer, OllamaTextGenerator};
use storyvox_pipeline::{PipelineConfig, PipelineOrchestrator};
use tracing::{info, instrument};

/// Build an orchestrator talking to the configured Ollama model and HTTP
/// services.
///
/// The illustrator is only created when `pipeline.enable_images` is set.
///
/// # Errors
///
/// Returns the first problem found by [`PipelineConfig::validate`].
#[instrument(skip_all, fields(model = %config.text.model))]
pub fn build_orchestrator(config: &PipelineConfig) -> StoryvoxResult<PipelineOrchestrator> {
    let mut text =
        OllamaTextGenerator::new_with_url(&config.text.model, &config.text.host, config.text.port);
    if let Some(system_prompt) = &config.text.system_prompt {
        text = text.with_system_prompt(system_prompt);
    }

    let speech = HttpSpeechSynthesizer::new(&config.speech.endpoint, &config.output.fragment_dir)
        .with_extension(&config.speech.fragment_extension);

    let illustrator = config.pipeline.enable_images.then(|| {
        Arc::new(HttpSceneIllustrator::new(
            &config.images.endpoint,
            &config.output.image_dir,
        )) as Arc<dyn SceneIllustrator>
    });

    info!(
        speech = %config.speech.endpoint,
        images = config.pipeline.enable_images,
        "Collaborators configured"
    );

    PipelineOrchestrator::new(Arc::new(text), Arc::new(speech), illustrator, config)
}
