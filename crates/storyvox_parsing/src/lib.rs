//! Parsers for loosely structured model output.
//!
//! The segmentation and scene-planning models answer in free text that
//! usually, but not always, follows the requested line format. Both parsers
//! are pure line-oriented matchers: lines that do not fit are dropped and
//! parsing continues. Neither parser returns an error; an empty result is a
//! valid outcome that the caller interprets.
//!
//! # Examples
//!
//! ```
//! use storyvox_core::Emotion;
//! use storyvox_parsing::EmotionParser;
//!
//! let raw = "Sentence: A cat sat. | Emotion: calm\n\
//!            Sentence: It purred. | Emotion: calm\n\
//!            Sentence: Then it hissed! | Emotion: angry";
//!
//! let segments = EmotionParser::default().parse(raw);
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].text, "A cat sat. It purred.");
//! assert_eq!(segments[1].emotion, Emotion::Angry);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod emotion;
mod scene;

pub use emotion::{EmotionParser, UnknownEmotionPolicy, merge_runs, normalize_emotion};
pub use scene::ScenePlanParser;
