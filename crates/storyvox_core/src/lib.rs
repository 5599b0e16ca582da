//! Core data types for the storyvox narration pipeline.
//!
//! Everything here is created and consumed within a single pipeline run.
//! None of these types carry shared mutable state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod emotion;
mod format;
mod fragment;
mod request;
mod result;
mod scene;
mod sentence;

pub use artifact::{AudioArtifact, ImageArtifact};
pub use emotion::Emotion;
pub use format::AudioFormat;
pub use fragment::{AudioFragmentRef, FragmentLocation};
pub use request::StoryRequest;
pub use result::{PipelineResult, PipelineResultBuilder};
pub use scene::ScenePlan;
pub use sentence::SentenceEmotion;
