//! Error types for the storyvox pipeline.
//!
//! This crate provides the error taxonomy shared by every storyvox crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Malformed model output is never an error here: the parsers drop noise
//! lines and only the orchestrator decides whether an empty parse is fatal
//! (see [`SegmentationError`]).
//!
//! # Examples
//!
//! ```
//! use storyvox_error::{StoryvoxResult, ValidationError, ValidationErrorKind};
//!
//! fn pick_format(token: &str) -> StoryvoxResult<()> {
//!     Err(ValidationError::new(ValidationErrorKind::UnsupportedFormat(
//!         token.to_string(),
//!     )))?
//! }
//!
//! assert!(pick_format("aac").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembly;
mod config;
mod error;
mod http;
mod pipeline;
mod segmentation;
mod stage;
mod upstream;
mod validation;

pub use assembly::{AssemblyError, AssemblyErrorKind};
pub use config::ConfigError;
pub use error::{StoryvoxError, StoryvoxErrorKind, StoryvoxResult};
pub use http::HttpError;
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use segmentation::SegmentationError;
pub use stage::Stage;
pub use upstream::{
    CollaboratorError, CollaboratorErrorKind, CollaboratorResult, UpstreamError,
    UpstreamErrorKind,
};
pub use validation::{ValidationError, ValidationErrorKind};
