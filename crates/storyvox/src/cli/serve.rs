//! HTTP service command handler.

use std::sync::Arc;

use storyvox::{ConfigError, PipelineConfig, StoryvoxResult, build_orchestrator, server};
use tracing::info;

/// Apply `serve` flags on top of the loaded configuration.
pub fn apply_serve_overrides(
    config: &mut PipelineConfig,
    host: Option<String>,
    port: Option<u16>,
    disable_images: bool,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if disable_images {
        config.pipeline.enable_images = false;
    }
}

/// Serve the API until Ctrl-C.
pub async fn serve_api(config: &PipelineConfig) -> StoryvoxResult<()> {
    let orchestrator = Arc::new(build_orchestrator(config)?);

    let host = config.server.host.as_str();
    let addr = tokio::net::lookup_host((host, config.server.port))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| {
            ConfigError::new(format!(
                "Cannot resolve server address {}:{}",
                host, config.server.port
            ))
        })?;

    info!(images = orchestrator.images_enabled(), "Starting storyvox service");
    server::serve(orchestrator, addr, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
