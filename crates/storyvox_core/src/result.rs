//! The consolidated outcome of one pipeline run.

use crate::{AudioArtifact, ImageArtifact, SentenceEmotion};
use serde::Serialize;

/// Everything a completed run produced.
///
/// Immutable once built. `images` is empty when the illustration tail was
/// disabled or degraded.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct PipelineResult {
    /// Generated story text
    story: String,
    /// Merged segmentation in narration order
    sentences: Vec<SentenceEmotion>,
    /// Assembled narration
    audio: AudioArtifact,
    /// Scene illustrations in scene order
    #[builder(default)]
    images: Vec<ImageArtifact>,
}

impl PipelineResult {
    /// Creates a new result builder.
    pub fn builder() -> PipelineResultBuilder {
        PipelineResultBuilder::default()
    }

    /// Whether the illustration tail contributed anything.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}
