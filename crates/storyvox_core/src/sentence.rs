//! Sentence/emotion pairs produced by segmentation.

use crate::Emotion;
use serde::{Deserialize, Serialize};

/// One narration segment: a run of text voiced with a single emotion.
///
/// Order within a segmentation is narration order.
///
/// # Examples
///
/// ```
/// use storyvox_core::{Emotion, SentenceEmotion};
///
/// let segment = SentenceEmotion::new("A cat sat.", Emotion::Calm);
/// assert_eq!(segment.text, "A cat sat.");
/// assert_eq!(
///     serde_json::to_string(&segment).unwrap(),
///     r#"{"text":"A cat sat.","emotion":"calm"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SentenceEmotion {
    /// Narrated text, never empty
    pub text: String,
    /// Emotion the text is voiced with
    pub emotion: Emotion,
}

impl SentenceEmotion {
    /// Create a new segment.
    pub fn new(text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            text: text.into(),
            emotion,
        }
    }
}
