//! Assembly errors raised while decoding or writing audio.

/// Specific assembly failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AssemblyErrorKind {
    /// A fragment could not be decoded
    #[display("Failed to decode fragment {}: {}", sequence, reason)]
    Decode {
        /// Sequence position of the offending fragment
        sequence: usize,
        /// Decoder message
        reason: String,
    },
    /// A fragment's sample rate or channel layout differs from the first fragment
    #[display("Fragment {} is {} but the stream is {}", sequence, found, expected)]
    SpecMismatch {
        /// Sequence position of the offending fragment
        sequence: usize,
        /// Stream spec established by the first fragment
        expected: String,
        /// Spec of the offending fragment
        found: String,
    },
    /// Writing the assembled stream failed
    #[display("Failed to write assembled audio: {}", _0)]
    Write(String),
    /// Container conversion failed
    #[display("Failed to transcode assembled audio: {}", _0)]
    Transcode(String),
}

impl AssemblyErrorKind {
    /// Sequence of the fragment that caused the failure, if any.
    pub fn fragment(&self) -> Option<usize> {
        match self {
            Self::Decode { sequence, .. } | Self::SpecMismatch { sequence, .. } => {
                Some(*sequence)
            }
            Self::Write(_) | Self::Transcode(_) => None,
        }
    }
}

/// Assembly error with location tracking.
///
/// # Examples
///
/// ```
/// use storyvox_error::{AssemblyError, AssemblyErrorKind};
///
/// let err = AssemblyError::new(AssemblyErrorKind::Decode {
///     sequence: 2,
///     reason: "unexpected end of stream".to_string(),
/// });
/// assert_eq!(err.kind.fragment(), Some(2));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Assembly Error: {} at line {} in {}", kind, line, file)]
pub struct AssemblyError {
    /// The specific error condition
    pub kind: AssemblyErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AssemblyError {
    /// Create a new AssemblyError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssemblyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
