//! Run-level pipeline errors.

/// Run-level failure conditions not attributable to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// A required request field is empty
    #[display("Request field '{}' must not be empty", _0)]
    InvalidRequest(&'static str),
    /// The run was cancelled by its caller
    #[display("Run cancelled")]
    Cancelled,
    /// A blocking task panicked or was aborted
    #[display("Background task failed: {}", _0)]
    Task(String),
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use storyvox_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InvalidRequest("genre"));
/// assert!(format!("{}", err).contains("genre"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
