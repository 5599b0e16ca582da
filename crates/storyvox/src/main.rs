//! storyvox CLI binary.
//!
//! - `storyvox run` narrates one storyline and prints the result
//! - `storyvox serve` exposes the pipeline over HTTP

use anyhow::Context;
use clap::Parser;
use storyvox::{PipelineConfig, StoryRequest};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{
        Cli, Commands, apply_run_overrides, apply_serve_overrides, render_summary, run_story,
        serve_api,
    };

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log = storyvox::telemetry::LogOptions {
        verbose: cli.verbose,
        json: cli.json_logs,
    };
    #[cfg(feature = "observability")]
    let provider = storyvox::observability::init_observability(
        storyvox::observability::ObservabilityConfig::default().with_log(log),
    )
    .map_err(|e| anyhow::anyhow!(e))?;
    #[cfg(not(feature = "observability"))]
    storyvox::telemetry::init_logging(log).map_err(|e| anyhow::anyhow!(e))?;

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::load()?,
    };

    match cli.command {
        Commands::Run {
            storyline,
            genre,
            no_images,
            format,
            json,
        } => {
            apply_run_overrides(&mut config, no_images, format);
            let result = run_story(&config, StoryRequest::new(storyline, genre)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_summary(&result));
            }
        }

        Commands::Serve {
            host,
            port,
            disable_images,
        } => {
            apply_serve_overrides(&mut config, host, port, disable_images);
            serve_api(&config).await?;
        }
    }

    #[cfg(feature = "observability")]
    storyvox::observability::shutdown_observability(provider);

    Ok(())
}
