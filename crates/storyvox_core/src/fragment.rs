//! Handles to synthesized audio fragments.

use std::path::{Path, PathBuf};

/// Where a synthesized fragment lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::From)]
pub enum FragmentLocation {
    /// Encoded audio on disk
    File(PathBuf),
    /// Encoded audio held in memory
    Memory(Vec<u8>),
}

impl FragmentLocation {
    /// Path of a file-backed fragment.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Memory(_) => None,
        }
    }

    /// Human-readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

/// A synthesized fragment tagged with its narration position.
///
/// `sequence` equals the position of the [`SentenceEmotion`](crate::SentenceEmotion)
/// the fragment voices. Fragments are moved into assembly and consumed once.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use storyvox_core::{AudioFragmentRef, FragmentLocation};
///
/// let fragment = AudioFragmentRef::new(0, PathBuf::from("/tmp/0.wav"));
/// assert_eq!(fragment.sequence, 0);
/// assert!(matches!(fragment.location, FragmentLocation::File(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFragmentRef {
    /// 0-based narration position
    pub sequence: usize,
    /// Where the encoded audio lives
    pub location: FragmentLocation,
}

impl AudioFragmentRef {
    /// Create a new fragment reference.
    pub fn new(sequence: usize, location: impl Into<FragmentLocation>) -> Self {
        Self {
            sequence,
            location: location.into(),
        }
    }
}
