//! Output container formats.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use storyvox_error::{ValidationError, ValidationErrorKind};

/// Container the assembled narration is written in.
///
/// # Examples
///
/// ```
/// use storyvox_core::AudioFormat;
///
/// let format: AudioFormat = "FLAC".parse().unwrap();
/// assert_eq!(format, AudioFormat::Flac);
/// assert_eq!(format.extension(), "flac");
/// assert!("aac".parse::<AudioFormat>().is_err());
/// ```
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
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AudioFormat {
    /// MPEG-1 Layer III
    Mp3,
    /// RIFF WAVE
    #[default]
    Wav,
    /// Ogg Vorbis
    Ogg,
    /// Free Lossless Audio Codec
    Flac,
}

impl AudioFormat {
    /// File extension for the container.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }

    /// Infer the container from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for AudioFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "ogg" => Ok(Self::Ogg),
            "flac" => Ok(Self::Flac),
            _ => Err(ValidationError::new(ValidationErrorKind::UnsupportedFormat(
                s.to_string(),
            ))),
        }
    }
}
