//! Chat Relay Server - Binary Entry Point
//!
//! Reads settings from the environment, then serves `/ws` until SIGINT or
//! SIGTERM.

use chat_relay::config::RelayConfig;
use chat_relay::server;
use chat_relay::types::RelayResult;

#[tokio::main]
async fn main() -> RelayResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = RelayConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    tracing::info!(
        port = config.listen_port,
        window_ms = config.rate_window_ms,
        max_events = config.rate_max_events,
        max_event_bytes = config.max_event_bytes,
        "Starting chat relay"
    );

    server::run(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Server listen error");
    })
}
