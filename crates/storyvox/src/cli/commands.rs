//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// storyvox - turn a storyline into a narrated, illustrated story
#[derive(Parser, Debug)]
#[command(name = "storyvox")]
#[command(about = "Turn a storyline into a narrated, illustrated story", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file loaded over the bundled defaults
    #[arg(long, global = true, env = "STORYVOX_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate, narrate and illustrate one story
    Run {
        /// What the story is about
        #[arg(long)]
        storyline: String,

        /// Genre of the story
        #[arg(long)]
        genre: String,

        /// Skip scene planning and illustration
        #[arg(long)]
        no_images: bool,

        /// Container for the narration
        #[arg(long, value_parser = ["wav", "mp3", "ogg", "flac"])]
        format: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(long)]
        port: Option<u16>,

        /// Run without scene illustration
        #[arg(long)]
        disable_images: bool,
    },
}
