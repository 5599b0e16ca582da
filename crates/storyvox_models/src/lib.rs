//! Concrete collaborators for the storyvox pipeline.
//!
//! Story text comes from a local Ollama model; speech and images come from
//! HTTP services that accept a small JSON body and answer with raw bytes.
//!
//! # Features
//!
//! - `ollama` (default): [`OllamaTextGenerator`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod http;
#[cfg(feature = "ollama")]
mod ollama;

pub use http::{HttpSceneIllustrator, HttpSpeechSynthesizer};
#[cfg(feature = "ollama")]
pub use ollama::OllamaTextGenerator;
