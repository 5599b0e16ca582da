//! Empty segmentation outcome.

/// Segmentation produced zero usable sentence/emotion pairs.
///
/// Distinct from an upstream failure: the segmentation model answered,
/// but nothing in the answer could be synthesized.
///
/// # Examples
///
/// ```
/// use storyvox_error::SegmentationError;
///
/// let err = SegmentationError::new(42, 3);
/// assert!(format!("{}", err).contains("3 candidate lines"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Segmentation Error: no usable sentence/emotion pairs in {} bytes of output ({} candidate lines) at line {} in {}",
    raw_len,
    candidate_lines,
    line,
    file
)]
pub struct SegmentationError {
    /// Length of the raw model output in bytes
    pub raw_len: usize,
    /// Number of lines that contained a separator
    pub candidate_lines: usize,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SegmentationError {
    /// Create a new SegmentationError with automatic location tracking.
    #[track_caller]
    pub fn new(raw_len: usize, candidate_lines: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            raw_len,
            candidate_lines,
            line: location.line(),
            file: location.file(),
        }
    }
}
