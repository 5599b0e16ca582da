//! Validation errors for structurally invalid assembly requests.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Output container token is not one of mp3, wav, ogg, flac
    #[display("Unsupported output format '{}' (supported: mp3, wav, ogg, flac)", _0)]
    UnsupportedFormat(String),
    /// No fragments were supplied
    #[display("No audio fragments to assemble")]
    NoFragments,
    /// Fragment file does not exist
    #[display("Fragment {} not found at {}", sequence, location)]
    MissingFragment {
        /// Sequence position of the fragment
        sequence: usize,
        /// Where the fragment was expected
        location: String,
    },
    /// Fragment exists but cannot be read
    #[display("Fragment {} is unreadable: {}", sequence, reason)]
    UnreadableFragment {
        /// Sequence position of the fragment
        sequence: usize,
        /// Why the fragment could not be read
        reason: String,
    },
    /// Fragment list is not in narration order
    #[display("Fragment at position {} carries sequence {}", position, sequence)]
    SequenceMismatch {
        /// Position in the supplied list
        position: usize,
        /// Sequence number carried by the fragment
        sequence: usize,
    },
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use storyvox_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::NoFragments);
/// assert!(format!("{}", err).contains("No audio fragments"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error condition
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
