//! Relay server lifecycle
//!
//! Binds the listener, serves the router and shuts down on SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::http::create_router;
use crate::api::websocket::AppState;
use crate::config::RelayConfig;
use crate::types::RelayResult;

/// Connections get this long to drain after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Handle returned by [`start`]; keeps the server task alive
pub struct ServerHandle {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Stop serving immediately
    pub fn abort(&self) {
        self.task.abort();
    }
}

async fn bind(config: &RelayConfig) -> RelayResult<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {}: {}", addr, e))?;
    Ok(listener)
}

/// Bind and serve in a background task. Port 0 picks a free port.
pub async fn start(config: RelayConfig) -> RelayResult<ServerHandle> {
    config.validate()?;
    let listener = bind(&config).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(config));
    let router = create_router(Arc::clone(&state));

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    tracing::info!(port = addr.port(), "Relay server started");
    Ok(ServerHandle { addr, state, task })
}

/// Serve until a shutdown signal arrives
pub async fn run(config: RelayConfig) -> RelayResult<()> {
    config.validate()?;
    let listener = bind(&config).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(config));
    let router = create_router(state);

    tracing::info!(port = addr.port(), "Server running");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            tracing::info!(signal, "Shutdown signal received, closing server");
            // Open sockets may hold the graceful drain forever
            tokio::spawn(async {
                tokio::time::sleep(SHUTDOWN_GRACE).await;
                tracing::error!("Connections did not drain in time, forcing exit");
                std::process::exit(1);
            });
        })
        .await?;

    tracing::info!("Server closed");
    Ok(())
}

/// Resolves with the name of the first signal received
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
