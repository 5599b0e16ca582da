//! Collaborator traits.

use async_trait::async_trait;
use storyvox_core::{Emotion, FragmentLocation, ImageArtifact};
use storyvox_error::CollaboratorResult;

/// Free-text generation.
///
/// Used for story writing, segmentation and scene planning; only the
/// instruction differs between the three.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use storyvox_error::CollaboratorResult;
/// use storyvox_interface::TextGenerator;
///
/// struct Echo;
///
/// #[async_trait]
/// impl TextGenerator for Echo {
///     async fn generate(&self, instruction: &str) -> CollaboratorResult<String> {
///         Ok(instruction.to_string())
///     }
///
///     fn model_name(&self) -> &str {
///         "echo"
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// assert_eq!(Echo.generate("hi").await.unwrap(), "hi");
/// # });
/// ```
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for an instruction.
    async fn generate(&self, instruction: &str) -> CollaboratorResult<String>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}

/// Emotional text-to-speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Voice `text` with `emotion`, returning where the encoded fragment lives.
    ///
    /// The caller owns the returned fragment and assigns its sequence.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedEmotion` when no voice exists for the label.
    async fn synthesize(&self, emotion: Emotion, text: &str)
    -> CollaboratorResult<FragmentLocation>;
}

/// Image generation from a scene prompt.
#[async_trait]
pub trait SceneIllustrator: Send + Sync {
    /// Render one image for `prompt`.
    async fn illustrate(&self, prompt: &str) -> CollaboratorResult<ImageArtifact>;
}
