//! One-shot pipeline run.

use storyvox::{PipelineConfig, PipelineResult, StoryRequest, StoryvoxResult, build_orchestrator};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Apply `run` flags on top of the loaded configuration.
pub fn apply_run_overrides(config: &mut PipelineConfig, no_images: bool, format: Option<String>) {
    if no_images {
        config.pipeline.enable_images = false;
    }
    if let Some(format) = format {
        config.pipeline.output_format = format;
    }
}

/// Run one request; Ctrl-C cancels it.
pub async fn run_story(
    config: &PipelineConfig,
    request: StoryRequest,
) -> StoryvoxResult<PipelineResult> {
    let orchestrator = build_orchestrator(config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling run");
            on_interrupt.cancel();
        }
    });

    info!(genre = %request.genre, "Starting run");
    orchestrator.run_with_cancellation(&request, cancel).await
}

/// Human-readable report of a finished run.
pub fn render_summary(result: &PipelineResult) -> String {
    let mut out = String::new();
    out.push_str(result.story().trim());
    out.push_str("\n\n");

    for (position, sentence) in result.sentences().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. [{}] {}\n",
            position + 1,
            sentence.emotion,
            sentence.text
        ));
    }

    let audio = result.audio();
    out.push_str(&format!(
        "\nNarration: {} ({:.1}s, {})\n",
        audio.path.display(),
        audio.duration_seconds,
        audio.format
    ));

    if result.has_images() {
        out.push_str("Illustrations:\n");
        for image in result.images() {
            out.push_str(&format!("  {}\n", image.path.display()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use storyvox::{AudioArtifact, AudioFormat, Emotion, SentenceEmotion};

    #[test]
    fn overrides_only_touch_given_flags() {
        let mut config = PipelineConfig::default();
        apply_run_overrides(&mut config, false, None);
        assert_eq!(config, PipelineConfig::default());

        apply_run_overrides(&mut config, true, Some("flac".to_string()));
        assert!(!config.pipeline.enable_images);
        assert_eq!(config.output_format().unwrap(), AudioFormat::Flac);
    }

    #[test]
    fn summary_lists_segments_and_narration() {
        let result = PipelineResult::builder()
            .story("The bell rang. Nobody came.")
            .sentences(vec![
                SentenceEmotion::new("The bell rang.", Emotion::Surprise),
                SentenceEmotion::new("Nobody came.", Emotion::Sad),
            ])
            .audio(AudioArtifact {
                path: PathBuf::from("output/audio/2025-01-01/story_120000_abcd1234.wav"),
                format: AudioFormat::Wav,
                duration_seconds: 3.5,
                sample_rate: 22_050,
                channels: 1,
            })
            .build()
            .unwrap();

        let summary = render_summary(&result);
        assert!(summary.contains("  1. [surprise] The bell rang."));
        assert!(summary.contains("  2. [sad] Nobody came."));
        assert!(summary.contains("story_120000_abcd1234.wav (3.5s, wav)"));
        assert!(!summary.contains("Illustrations"));
    }
}
