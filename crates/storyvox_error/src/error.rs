//! Top-level error wrapper types.

use crate::{
    AssemblyError, CollaboratorError, ConfigError, HttpError, PipelineError, SegmentationError,
    Stage, UpstreamError, ValidationError,
};

/// Every error a storyvox operation can surface.
///
/// # Examples
///
/// ```
/// use storyvox_error::{StoryvoxError, StoryvoxErrorKind, ConfigError};
///
/// let err: StoryvoxError = ConfigError::new("missing [speech] endpoint").into();
/// assert!(matches!(err.kind(), StoryvoxErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryvoxErrorKind {
    /// Structurally invalid assembly request
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Decode or write failure during assembly
    #[from(AssemblyError)]
    Assembly(AssemblyError),
    /// Collaborator call failure attributed to a stage
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Collaborator failure not yet attributed to a stage
    #[from(CollaboratorError)]
    Collaborator(CollaboratorError),
    /// Segmentation yielded nothing to synthesize
    #[from(SegmentationError)]
    Segmentation(SegmentationError),
    /// Run-level failure
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// HTTP service error
    #[from(HttpError)]
    Http(HttpError),
}

/// Storyvox error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyvox_error::{StoryvoxResult, PipelineError, PipelineErrorKind};
///
/// fn run() -> StoryvoxResult<()> {
///     Err(PipelineError::new(PipelineErrorKind::Cancelled))?
/// }
///
/// assert!(run().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyvox Error: {}", _0)]
pub struct StoryvoxError(Box<StoryvoxErrorKind>);

impl StoryvoxError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryvoxErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryvoxErrorKind {
        &self.0
    }

    /// Stage the failure is attributed to, if it came from a stage call.
    pub fn stage(&self) -> Option<Stage> {
        match self.kind() {
            StoryvoxErrorKind::Upstream(e) => Some(e.stage),
            StoryvoxErrorKind::Segmentation(_) => Some(Stage::Segmentation),
            StoryvoxErrorKind::Validation(_) | StoryvoxErrorKind::Assembly(_) => {
                Some(Stage::Assembly)
            }
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StoryvoxErrorKind
impl<T> From<T> for StoryvoxError
where
    T: Into<StoryvoxErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for storyvox operations.
pub type StoryvoxResult<T> = std::result::Result<T, StoryvoxError>;
