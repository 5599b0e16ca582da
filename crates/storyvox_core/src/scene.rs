//! Scene plans produced by scene planning.

use serde::{Deserialize, Serialize};

/// A time range of the narration paired with an image prompt.
///
/// `end > start` is expected but not enforced; degenerate ranges are kept
/// as the model emitted them.
///
/// # Examples
///
/// ```
/// use storyvox_core::ScenePlan;
///
/// let scene = ScenePlan::new(1, 0.0, 10.0, "a quiet forest at dawn");
/// assert_eq!(scene.duration(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePlan {
    /// 1-based position in emission order
    pub index: u32,
    /// Start of the range in seconds
    pub start: f64,
    /// End of the range in seconds
    pub end: f64,
    /// Image prompt, never empty
    pub prompt: String,
}

impl ScenePlan {
    /// Create a new scene plan.
    pub fn new(index: u32, start: f64, end: f64, prompt: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            prompt: prompt.into(),
        }
    }

    /// Length of the range in seconds (negative for inverted ranges).
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
