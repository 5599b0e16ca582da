//! Artifact naming on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use storyvox_core::AudioFormat;

use crate::OutputSettings;

/// Decides where each run's narration is written.
///
/// Narrations land in date-partitioned directories under `audio_dir` as
/// `YYYY-MM-DD/story_HHMMSS_<id>.<ext>`.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use storyvox_core::AudioFormat;
/// use storyvox_pipeline::{OutputLayout, OutputSettings};
///
/// let layout = OutputLayout::from(&OutputSettings::default());
/// let at = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
/// let path = layout.audio_destination(at, AudioFormat::Mp3);
///
/// assert!(path.starts_with("output/audio/2025-03-09"));
/// let name = path.file_name().unwrap().to_str().unwrap();
/// assert!(name.starts_with("story_070501_"));
/// assert!(name.ends_with(".mp3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct OutputLayout {
    /// Root of the narration directories
    audio_dir: PathBuf,
    /// Scene illustrations
    image_dir: PathBuf,
    /// Synthesized fragments
    fragment_dir: PathBuf,
}

impl From<&OutputSettings> for OutputLayout {
    fn from(settings: &OutputSettings) -> Self {
        Self::new(
            &settings.audio_dir,
            &settings.image_dir,
            &settings.fragment_dir,
        )
    }
}

impl OutputLayout {
    /// Create a layout rooted at the given directories.
    pub fn new(
        audio_dir: impl AsRef<Path>,
        image_dir: impl AsRef<Path>,
        fragment_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            audio_dir: audio_dir.as_ref().to_path_buf(),
            image_dir: image_dir.as_ref().to_path_buf(),
            fragment_dir: fragment_dir.as_ref().to_path_buf(),
        }
    }

    /// A fresh narration path for a run finishing at `at`.
    pub fn audio_destination(&self, at: DateTime<Local>, format: AudioFormat) -> PathBuf {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!(
            "story_{}_{}.{}",
            at.format("%H%M%S"),
            &id[..8],
            format.extension()
        );
        self.audio_dir
            .join(at.format("%Y-%m-%d").to_string())
            .join(name)
    }
}
