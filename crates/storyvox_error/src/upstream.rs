//! Collaborator and upstream stage errors.
//!
//! Collaborator adapters report a [`CollaboratorError`]; the orchestrator
//! attributes it to a [`Stage`] by wrapping it in an [`UpstreamError`].

use crate::Stage;

/// Failure conditions reported by a collaborator adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CollaboratorErrorKind {
    /// The collaborator could not be reached
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The collaborator answered with a failure
    #[display("Request rejected: {}", _0)]
    Rejected(String),
    /// The synthesizer has no voice for the emotion label
    #[display("Unrecognized emotion label: {}", _0)]
    UnrecognizedEmotion(String),
    /// The collaborator answered without content
    #[display("Empty output")]
    EmptyOutput,
    /// Persisting the collaborator's output failed
    #[display("I/O failure: {}", _0)]
    Io(String),
}

/// Collaborator error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Collaborator Error: {} at line {} in {}", kind, line, file)]
pub struct CollaboratorError {
    /// The specific error condition
    pub kind: CollaboratorErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl CollaboratorError {
    /// Create a new CollaboratorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CollaboratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Why a stage call failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// The call exceeded its timeout
    #[display("timed out after {}ms", _0)]
    Timeout(u64),
    /// The collaborator reported a failure
    #[display("{}", _0)]
    Collaborator(CollaboratorErrorKind),
}

/// A collaborator call failure attributed to a pipeline stage.
///
/// # Examples
///
/// ```
/// use storyvox_error::{CollaboratorErrorKind, Stage, UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(
///     Stage::Story,
///     UpstreamErrorKind::Collaborator(CollaboratorErrorKind::Transport(
///         "connection refused".to_string(),
///     )),
/// );
/// assert!(format!("{}", err).contains("stage=story"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error (stage={}): {} at line {} in {}", stage, kind, line, file)]
pub struct UpstreamError {
    /// Stage whose collaborator call failed
    pub stage: Stage,
    /// The specific error condition
    pub kind: UpstreamErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new UpstreamError with automatic location tracking.
    #[track_caller]
    pub fn new(stage: Stage, kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            stage,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attribute a collaborator failure to a stage.
    #[track_caller]
    pub fn from_collaborator(stage: Stage, err: CollaboratorError) -> Self {
        Self::new(stage, UpstreamErrorKind::Collaborator(err.kind))
    }
}
