//! Layered pipeline configuration.
//!
//! Precedence, lowest to highest:
//! 1. Bundled defaults (`storyvox.toml` at the workspace root)
//! 2. `~/.config/storyvox/storyvox.toml`
//! 3. `./storyvox.toml`
//! 4. `STORYVOX__<SECTION>__<KEY>` environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use storyvox_audio::Transcoder;
use storyvox_core::AudioFormat;
use storyvox_error::{ConfigError, StoryvoxError, StoryvoxResult, ValidationError};
use storyvox_parsing::UnknownEmotionPolicy;
use tracing::{debug, instrument};

use crate::PromptTemplates;

const DEFAULT_CONFIG: &str = include_str!("../../../storyvox.toml");
const ENV_PREFIX: &str = "STORYVOX";
const ENV_SEPARATOR: &str = "__";

/// Assistant instruction sent ahead of every text generation prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a story generator. Generate stories true to the requested genre and do not exceed the length limit.";

/// Run behaviour shared by every run of one orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Whether the scene planning and illustration tail runs
    pub enable_images: bool,
    /// Collaborator calls allowed in flight across all runs
    pub max_concurrent_calls: usize,
    /// Synthesis calls one run keeps in flight
    pub max_in_flight_per_run: usize,
    /// Container token for the assembled narration
    pub output_format: String,
    /// Remove fragment files once assembly has finished
    pub cleanup_fragments: bool,
    /// Handling of emotion labels outside the closed set
    pub unknown_emotion: UnknownEmotionPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            enable_images: true,
            max_concurrent_calls: 4,
            max_in_flight_per_run: 4,
            output_format: AudioFormat::Wav.to_string(),
            cleanup_fragments: true,
            unknown_emotion: UnknownEmotionPolicy::Reject,
        }
    }
}

/// Per-collaborator call timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Story, segmentation and scene-planning calls
    pub text_generation_secs: u64,
    /// One speech synthesis call
    pub synthesis_secs: u64,
    /// One illustration call
    pub illustration_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            text_generation_secs: 120,
            synthesis_secs: 180,
            illustration_secs: 300,
        }
    }
}

impl TimeoutSettings {
    /// Timeout for text generation calls.
    pub fn text_generation(&self) -> Duration {
        Duration::from_secs(self.text_generation_secs)
    }

    /// Timeout for synthesis calls.
    pub fn synthesis(&self) -> Duration {
        Duration::from_secs(self.synthesis_secs)
    }

    /// Timeout for illustration calls.
    pub fn illustration(&self) -> Duration {
        Duration::from_secs(self.illustration_secs)
    }
}

/// Where artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Root of the date-partitioned narration files
    pub audio_dir: PathBuf,
    /// Scene illustrations
    pub image_dir: PathBuf,
    /// Synthesized fragments awaiting assembly
    pub fragment_dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("output/audio"),
            image_dir: PathBuf::from("output/images"),
            fragment_dir: PathBuf::from("output/fragments"),
        }
    }
}

/// Ollama text generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    /// Ollama host URL
    pub host: String,
    /// Ollama port
    pub port: u16,
    /// Model name
    pub model: String,
    /// Assistant instruction sent with every prompt
    pub system_prompt: Option<String>,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: 11434,
            model: "gemma3:4b-it-qat".to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

/// HTTP speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Synthesis endpoint URL
    pub endpoint: String,
    /// Extension of the fragment files the service returns
    pub fragment_extension: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50052/synthesize".to_string(),
            fragment_extension: "wav".to_string(),
        }
    }
}

/// HTTP scene illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    /// Illustration endpoint URL
    pub endpoint: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50053/illustrate".to_string(),
        }
    }
}

/// HTTP service bind address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Optional replacements for the built-in instruction templates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Story instruction; placeholders `{storyline}` and `{genre}`
    pub story: Option<String>,
    /// Segmentation instruction; placeholder `{story}`
    pub segmentation: Option<String>,
    /// Scene-planning instruction; placeholders `{story}` and `{duration}`
    pub scene_planning: Option<String>,
}

/// Complete storyvox configuration.
///
/// # Examples
///
/// ```
/// use storyvox_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert!(config.pipeline.enable_images);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Run behaviour
    pub pipeline: PipelineSettings,
    /// Collaborator timeouts
    pub timeouts: TimeoutSettings,
    /// Artifact locations
    pub output: OutputSettings,
    /// Text generator
    pub text: TextSettings,
    /// Speech synthesizer
    pub speech: SpeechSettings,
    /// Scene illustrator
    pub images: ImageSettings,
    /// HTTP service
    pub server: ServerSettings,
    /// Instruction template overrides
    pub prompts: PromptSettings,
    /// Container converter
    pub transcoder: Transcoder,
}

impl PipelineConfig {
    /// Load configuration from every layer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a present file cannot be parsed or a
    /// value has the wrong type.
    #[instrument]
    pub fn load() -> StoryvoxResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = bundled();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyvox/storyvox.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("storyvox").required(false))
            .add_source(environment(None));

        finish(builder)
    }

    /// Load one explicit file over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryvoxResult<Self> {
        debug!("Loading configuration from file");
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.display()
            ))
            .into());
        }
        finish(bundled().add_source(File::from(path)))
    }

    /// Parse TOML text over the bundled defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyvox_pipeline::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_toml_str("[pipeline]\nenable_images = false\n").unwrap();
    /// assert!(!config.pipeline.enable_images);
    /// assert_eq!(config.timeouts.synthesis_secs, 180);
    /// ```
    pub fn from_toml_str(toml: &str) -> StoryvoxResult<Self> {
        finish(bundled().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    /// Reject settings no run could succeed with.
    ///
    /// # Errors
    ///
    /// - Configuration error for zero concurrency, a zero timeout or a
    ///   prompt override with an unknown placeholder
    /// - Validation error for an unsupported output format
    pub fn validate(&self) -> StoryvoxResult<()> {
        if self.pipeline.max_concurrent_calls == 0 {
            return Err(ConfigError::new("pipeline.max_concurrent_calls must be at least 1").into());
        }
        if self.pipeline.max_in_flight_per_run == 0 {
            return Err(
                ConfigError::new("pipeline.max_in_flight_per_run must be at least 1").into(),
            );
        }
        for (key, secs) in [
            ("text_generation_secs", self.timeouts.text_generation_secs),
            ("synthesis_secs", self.timeouts.synthesis_secs),
            ("illustration_secs", self.timeouts.illustration_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::new(format!("timeouts.{} must be at least 1", key)).into());
            }
        }
        self.output_format()?;
        PromptTemplates::from_settings(&self.prompts)?;
        Ok(())
    }

    /// The configured container.
    pub fn output_format(&self) -> Result<AudioFormat, ValidationError> {
        self.pipeline.output_format.parse()
    }
}

fn bundled() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

fn environment(source: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(source)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> StoryvoxResult<PipelineConfig> {
    builder
        .build()
        .map_err(|e| {
            StoryvoxError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            StoryvoxError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_rust_defaults() {
        let config = finish(bundled()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn environment_overrides_files() {
        let mut vars = config::Map::new();
        vars.insert(
            "STORYVOX__PIPELINE__ENABLE_IMAGES".to_string(),
            "false".to_string(),
        );
        vars.insert(
            "STORYVOX__TIMEOUTS__SYNTHESIS_SECS".to_string(),
            "9".to_string(),
        );
        vars.insert(
            "STORYVOX__SPEECH__ENDPOINT".to_string(),
            "http://tts.internal:9000/synthesize".to_string(),
        );

        let config = finish(
            bundled()
                .add_source(File::from_str(
                    "[pipeline]\nenable_images = true\n",
                    FileFormat::Toml,
                ))
                .add_source(environment(Some(vars))),
        )
        .unwrap();

        assert!(!config.pipeline.enable_images);
        assert_eq!(config.timeouts.synthesis_secs, 9);
        assert_eq!(config.speech.endpoint, "http://tts.internal:9000/synthesize");
        assert_eq!(config.text.port, 11434);
    }
}
