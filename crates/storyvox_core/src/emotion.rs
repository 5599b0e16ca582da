//! The closed set of narration emotions.

use serde::{Deserialize, Serialize};

/// Emotion a sentence is voiced with.
///
/// The set is closed: labels outside it are either rejected or mapped to
/// [`Emotion::Neutral`] by the segmentation parser, never invented.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use storyvox_core::Emotion;
///
/// assert_eq!(Emotion::from_str("calm").unwrap(), Emotion::Calm);
/// assert_eq!(Emotion::Surprise.to_string(), "surprise");
/// assert!(Emotion::from_str("bored").is_err());
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
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Emotion {
    /// Angry delivery
    Angry,
    /// Calm delivery
    Calm,
    /// Disgusted delivery
    Disgust,
    /// Fearful delivery
    Fear,
    /// Happy delivery
    Happy,
    /// Neutral delivery
    Neutral,
    /// Sad delivery
    Sad,
    /// Surprised delivery
    Surprise,
}

impl Emotion {
    /// Label sent to the speech synthesizer.
    pub fn label(&self) -> &str {
        self.as_ref()
    }
}
