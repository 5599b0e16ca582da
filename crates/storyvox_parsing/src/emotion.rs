//! Segmentation output parsing and emotion-run merging.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use storyvox_core::{Emotion, SentenceEmotion};
use tracing::{debug, instrument, trace, warn};

const SENTENCE_LABEL: &str = "Sentence:";
const EMOTION_LABEL: &str = "Emotion:";
const TERMINALS: &[char] = &['.', '!', '?', ':', ';'];

/// Misspellings and word forms models use in place of the closed set.
const ALIASES: &[(&str, Emotion)] = &[
    ("feat", Emotion::Fear),
    ("fearful", Emotion::Fear),
    ("scared", Emotion::Fear),
    ("anger", Emotion::Angry),
    ("happiness", Emotion::Happy),
    ("joy", Emotion::Happy),
    ("sadness", Emotion::Sad),
    ("surprised", Emotion::Surprise),
    ("disgusted", Emotion::Disgust),
];

/// What to do with an emotion label outside the closed set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnknownEmotionPolicy {
    /// Drop the line as parse noise
    #[default]
    Reject,
    /// Voice the line as neutral
    Neutral,
}

/// Resolve a raw label to the closed emotion set.
///
/// Lowercases, strips surrounding quotes, brackets and punctuation, then
/// checks the set and the alias table.
///
/// # Examples
///
/// ```
/// use storyvox_core::Emotion;
/// use storyvox_parsing::normalize_emotion;
///
/// assert_eq!(normalize_emotion(" [Calm]."), Some(Emotion::Calm));
/// assert_eq!(normalize_emotion("feat"), Some(Emotion::Fear));
/// assert_eq!(normalize_emotion("bored"), None);
/// ```
pub fn normalize_emotion(label: &str) -> Option<Emotion> {
    let cleaned = label
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    Emotion::from_str(&cleaned).ok().or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == cleaned)
            .map(|(_, emotion)| *emotion)
    })
}

/// Coalesce adjacent segments that share an emotion.
///
/// Texts are joined with a space when the running text already ends in
/// sentence-terminal punctuation, otherwise with `". "`. No text is lost and
/// no two adjacent output segments share an emotion.
pub fn merge_runs(pairs: Vec<SentenceEmotion>) -> Vec<SentenceEmotion> {
    let mut merged: Vec<SentenceEmotion> = Vec::with_capacity(pairs.len());

    for pair in pairs {
        match merged.last_mut() {
            Some(current) if current.emotion == pair.emotion => {
                if current.text.ends_with(TERMINALS) {
                    current.text.push(' ');
                } else {
                    current.text.push_str(". ");
                }
                current.text.push_str(&pair.text);
            }
            _ => merged.push(pair),
        }
    }

    merged
}

/// Parser for `Sentence: <text> | Emotion: <label>` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmotionParser {
    policy: UnknownEmotionPolicy,
}

impl EmotionParser {
    /// Create a parser with the given unknown-label policy.
    pub fn new(policy: UnknownEmotionPolicy) -> Self {
        Self { policy }
    }

    /// The unknown-label policy in effect.
    pub fn policy(&self) -> UnknownEmotionPolicy {
        self.policy
    }

    /// Parse raw segmentation output into merged narration segments.
    #[instrument(skip_all, fields(raw_len = raw.len(), policy = %self.policy))]
    pub fn parse(&self, raw: &str) -> Vec<SentenceEmotion> {
        let pairs = self.pairs(raw);
        let parsed = pairs.len();
        let merged = merge_runs(pairs);
        debug!(parsed, merged = merged.len(), "Parsed segmentation output");
        merged
    }

    /// Parse raw segmentation output without merging runs.
    pub fn pairs(&self, raw: &str) -> Vec<SentenceEmotion> {
        let mut pairs = Vec::new();

        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let Some((sentence_part, emotion_part)) = line.split_once('|') else {
                if !line.trim().is_empty() {
                    trace!(line = line_no, "Dropping line without separator");
                }
                continue;
            };

            let text = strip_label(sentence_part, SENTENCE_LABEL);
            let label = strip_label(emotion_part, EMOTION_LABEL);
            if text.is_empty() || label.is_empty() {
                debug!(line = line_no, "Dropping line with empty sentence or emotion");
                continue;
            }

            let emotion = match (normalize_emotion(label), self.policy) {
                (Some(emotion), _) => emotion,
                (None, UnknownEmotionPolicy::Reject) => {
                    warn!(line = line_no, label, "Dropping line with unknown emotion");
                    continue;
                }
                (None, UnknownEmotionPolicy::Neutral) => {
                    warn!(line = line_no, label, "Voicing unknown emotion as neutral");
                    Emotion::Neutral
                }
            };

            pairs.push(SentenceEmotion::new(text, emotion));
        }

        pairs
    }

    /// Number of lines that carry a separator, whether or not they parsed.
    pub fn candidate_lines(raw: &str) -> usize {
        raw.lines().filter(|line| line.contains('|')).count()
    }
}

/// Trim a part and drop a leading label (and any list bullet before it).
///
/// Emphasis wrapped around the label, as in `**Sentence:** text`, goes with it.
fn strip_label<'a>(part: &'a str, label: &str) -> &'a str {
    let trimmed = part
        .trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '_' || c.is_whitespace());

    match trimmed.get(..label.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(label) => {
            strip_emphasis(&trimmed[label.len()..])
        }
        _ => trimmed.trim(),
    }
}

fn strip_emphasis(text: &str) -> &str {
    text.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_label_ignores_case_and_bullets() {
        assert_eq!(strip_label("  - sentence: Hello. ", SENTENCE_LABEL), "Hello.");
        assert_eq!(strip_label(" Emotion:calm", EMOTION_LABEL), "calm");
        assert_eq!(strip_label("No label here", SENTENCE_LABEL), "No label here");
    }

    #[test]
    fn strip_label_drops_emphasis_around_the_label() {
        assert_eq!(strip_label("**Sentence:** A cat", SENTENCE_LABEL), "A cat");
        assert_eq!(strip_label(" __Emotion:__ calm ", EMOTION_LABEL), "calm");
        assert_eq!(strip_label("- **Sentence:** **Run!**", SENTENCE_LABEL), "Run!");
    }

    #[test]
    fn strip_label_handles_multibyte_prefixes() {
        assert_eq!(strip_label("éé", SENTENCE_LABEL), "éé");
    }
}
