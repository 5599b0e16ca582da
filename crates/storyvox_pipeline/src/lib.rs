//! Orchestration of the storyvox pipeline.
//!
//! A run takes a storyline and a genre and moves through:
//!
//! 1. Story generation
//! 2. Sentence/emotion segmentation of the story
//! 3. Speech synthesis of every segment, then assembly into one narration
//! 4. Optionally, scene planning and one illustration per scene
//!
//! Steps 1 to 3 are mandatory: the first failure ends the run. Step 4 only
//! adds value, so a failure there is logged and the run completes without
//! images.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storyvox_pipeline::{PipelineConfig, PipelineOrchestrator};
//! # use storyvox_interface::{SpeechSynthesizer, TextGenerator};
//! # async fn example(
//! #     text: Arc<dyn TextGenerator>,
//! #     speech: Arc<dyn SpeechSynthesizer>,
//! # ) -> storyvox_error::StoryvoxResult<()> {
//! let config = PipelineConfig::load()?;
//! let orchestrator = PipelineOrchestrator::new(text, speech, None, &config)?;
//!
//! let result = orchestrator.run("a lighthouse keeper finds a letter", "mystery").await?;
//! println!("{}", result.audio().path.display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod layout;
mod limiter;
mod orchestrator;
mod prompts;
mod state;

pub use config::{
    DEFAULT_SYSTEM_PROMPT, ImageSettings, OutputSettings, PipelineConfig, PipelineSettings,
    PromptSettings, ServerSettings, SpeechSettings, TextSettings, TimeoutSettings,
};
pub use layout::OutputLayout;
pub use limiter::{CallGuard, CallLimiter};
pub use orchestrator::PipelineOrchestrator;
pub use prompts::PromptTemplates;
pub use state::PipelineState;
