//! The caller-facing run request.

use serde::{Deserialize, Serialize};
use storyvox_error::{PipelineError, PipelineErrorKind};

/// A storyline and genre to narrate.
///
/// # Examples
///
/// ```
/// use storyvox_core::StoryRequest;
///
/// let request = StoryRequest::new("a lighthouse keeper finds a letter", "mystery");
/// assert!(request.validate().is_ok());
/// assert!(StoryRequest::new("   ", "mystery").validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryRequest {
    /// What the story is about
    pub storyline: String,
    /// Genre the story is written in
    pub genre: String,
}

impl StoryRequest {
    /// Create a new request.
    pub fn new(storyline: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            storyline: storyline.into(),
            genre: genre.into(),
        }
    }

    /// Check that both fields carry text.
    ///
    /// No length cap is imposed here.
    #[track_caller]
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.storyline.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidRequest(
                "storyline",
            )));
        }
        if self.genre.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::InvalidRequest(
                "genre",
            )));
        }
        Ok(())
    }
}
