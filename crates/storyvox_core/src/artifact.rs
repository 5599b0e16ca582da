//! Artifact handles returned to callers.

use crate::AudioFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The assembled narration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioArtifact {
    /// Where the narration was written
    pub path: PathBuf,
    /// Container format
    pub format: AudioFormat,
    /// Measured length in seconds
    pub duration_seconds: f64,
    /// Sample rate shared by every fragment
    pub sample_rate: u32,
    /// Channel count shared by every fragment
    pub channels: u16,
}

/// A generated scene illustration.
///
/// # Examples
///
/// ```
/// use storyvox_core::ImageArtifact;
///
/// let image = ImageArtifact::new("output/images/scene.png");
/// assert!(image.path.ends_with("scene.png"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageArtifact {
    /// Where the image was written
    pub path: PathBuf,
}

impl ImageArtifact {
    /// Create a new image handle.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
