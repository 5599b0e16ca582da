//! Run progress through the pipeline.

use tracing::info;

/// Where a run is in the pipeline.
///
/// Runs move forward only:
/// `Idle → StoryGenerated → EmotionsSegmented → AudioSynthesized →
/// (ScenesPlanned → ImagesIllustrated) → Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum PipelineState {
    /// Nothing has happened yet
    #[default]
    Idle,
    /// The story text exists
    StoryGenerated,
    /// The story is split into sentence/emotion segments
    EmotionsSegmented,
    /// The narration is assembled
    AudioSynthesized,
    /// Scene prompts are planned
    ScenesPlanned,
    /// Scene illustrations are generated
    ImagesIllustrated,
    /// The result is ready
    Complete,
}

impl PipelineState {
    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: PipelineState) {
        info!(from = %self, to = %next, "Pipeline state transition");
        *self = next;
    }

    /// Whether the run produced a result.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}
