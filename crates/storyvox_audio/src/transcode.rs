//! Container conversion through an `ffmpeg` subprocess.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use storyvox_core::AudioFormat;
use storyvox_error::{AssemblyError, AssemblyErrorKind};
use tracing::{debug, instrument};

/// Converts an assembled WAV into another container.
///
/// # Examples
///
/// ```
/// use storyvox_audio::Transcoder;
///
/// let transcoder = Transcoder::new("/usr/local/bin/ffmpeg");
/// assert_eq!(transcoder.ffmpeg_path().to_str(), Some("/usr/local/bin/ffmpeg"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Transcoder {
    /// Path or name of the `ffmpeg` binary
    #[serde(default = "default_ffmpeg")]
    ffmpeg_path: PathBuf,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Default for Transcoder {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
        }
    }
}

impl Transcoder {
    /// Create a transcoder that runs the given binary.
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Whether the binary runs.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Convert `input` into `format`, writing `output`.
    ///
    /// `output` is overwritten if it exists.
    #[instrument(
        skip_all,
        fields(
            ffmpeg = %self.ffmpeg_path.display(),
            input = %input.display(),
            output = %output.display(),
            %format
        )
    )]
    pub fn transcode(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
    ) -> Result<(), AssemblyError> {
        let result = Command::new(&self.ffmpeg_path)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-c:a", codec(format)])
            .arg(output)
            .output()
            .map_err(|e| {
                AssemblyError::new(AssemblyErrorKind::Transcode(format!(
                    "failed to launch {}: {}",
                    self.ffmpeg_path.display(),
                    e
                )))
            })?;

        if !result.status.success() {
            return Err(AssemblyError::new(AssemblyErrorKind::Transcode(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ))));
        }

        debug!(%format, "Transcoded narration");
        Ok(())
    }
}

fn codec(format: AudioFormat) -> &'static str {
    match format {
        AudioFormat::Mp3 => "libmp3lame",
        AudioFormat::Ogg => "libvorbis",
        AudioFormat::Flac => "flac",
        AudioFormat::Wav => "copy",
    }
}
