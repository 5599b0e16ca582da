//! storyvox - storylines in, narrated stories out.
//!
//! storyvox asks a language model for a short story, has the same model
//! split it into sentences tagged with emotions, voices every sentence with an
//! emotional text-to-speech service, and joins the fragments into one
//! narration. When image generation is enabled it also plans scenes over the
//! finished narration and illustrates each one.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use storyvox::{PipelineConfig, build_orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::load()?;
//!     let orchestrator = build_orchestrator(&config)?;
//!
//!     let result = orchestrator
//!         .run("a lighthouse keeper finds a letter", "mystery")
//!         .await?;
//!     println!("Narration: {}", result.audio().path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - export tracing spans through OpenTelemetry
//!
//! # Architecture
//!
//! - `storyvox_error` - error taxonomy
//! - `storyvox_core` - data model
//! - `storyvox_interface` - collaborator traits
//! - `storyvox_parsing` - segmentation and scene-plan parsers
//! - `storyvox_audio` - fragment assembly
//! - `storyvox_models` - Ollama and HTTP collaborators
//! - `storyvox_pipeline` - orchestration, configuration, prompts
//!
//! This crate re-exports everything and adds the HTTP service and the
//! `storyvox` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use storyvox_audio::*;
pub use storyvox_core::*;
pub use storyvox_error::*;
pub use storyvox_interface::*;
pub use storyvox_models::*;
pub use storyvox_parsing::*;
pub use storyvox_pipeline::*;

pub mod server;
mod setup;
pub mod telemetry;

#[cfg(feature = "observability")]
pub mod observability;

pub use setup::build_orchestrator;
