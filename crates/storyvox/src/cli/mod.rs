//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyvox binary.

mod commands;
mod run;
mod serve;

pub use commands::{Cli, Commands};
pub use run::{apply_run_overrides, render_summary, run_story};
pub use serve::{apply_serve_overrides, serve_api};
