//! Pipeline stage identifiers.

use serde::{Deserialize, Serialize};

/// A discrete step of a run, used to attribute failures.
///
/// # Examples
///
/// ```
/// use storyvox_error::Stage;
///
/// assert_eq!(Stage::Story.to_string(), "story");
/// assert!(Stage::Illustration.is_optional());
/// assert!(!Stage::Synthesis.is_optional());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Story text generation
    Story,
    /// Sentence/emotion segmentation of the story
    Segmentation,
    /// Per-segment speech synthesis
    Synthesis,
    /// Concatenation of synthesized fragments
    Assembly,
    /// Scene planning over the story
    ScenePlanning,
    /// Per-scene image generation
    Illustration,
}

impl Stage {
    /// Whether a failure in this stage degrades the run instead of failing it.
    pub fn is_optional(&self) -> bool {
        matches!(self, Stage::ScenePlanning | Stage::Illustration)
    }
}
