//! Trait definitions for the external stage collaborators.
//!
//! The pipeline talks to three capabilities it does not implement itself:
//! text generation, emotional speech synthesis and scene illustration.
//! Each is injected into the orchestrator as a trait object so concurrent
//! runs and tests can supply their own implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{SceneIllustrator, SpeechSynthesizer, TextGenerator};
