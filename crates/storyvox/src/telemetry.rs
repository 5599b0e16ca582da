//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// How log output is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Default to `debug` instead of `info` when `RUST_LOG` is unset
    pub verbose: bool,
    /// Emit one JSON object per event
    pub json: bool,
}

impl LogOptions {
    /// The filter used when `RUST_LOG` is unset.
    pub fn default_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over [`LogOptions::verbose`].
///
/// # Errors
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_logging(options: LogOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(options.default_level()))?;

    let fmt_layer = if options.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
