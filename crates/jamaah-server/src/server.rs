//! Dashboard HTTP server lifecycle management.
//!
//! [`bind`] resolves and binds the configured address, classifying a
//! port conflict separately from other failures. [`serve`] runs the Axum
//! router on a bound listener until a shutdown future resolves, typically
//! [`ctrl_c`].

use std::future::Future;
use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerSettings;
use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the dashboard server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Another process already listens on the configured port.
    #[error("port {port} is already in use ({addr})")]
    AddrInUse {
        /// The `host:port` that was requested.
        addr: String,
        /// The conflicting port.
        port: u16,
    },

    /// Failed to bind to the network address for any other reason.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

impl ServerError {
    /// Operator-facing steps for resolving the error, if any.
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::AddrInUse { port, .. } => Some(format!(
                "Wait a minute and try again, or stop the process holding the port. \
                 Find it with `netstat -ano | findstr :{port}` (Windows) or \
                 `lsof -i :{port}` (Linux/macOS)."
            )),
            Self::Bind(_) | Self::Serve(_) => None,
        }
    }
}

/// Bind a TCP listener on the configured host and port.
///
/// The host may be a name (e.g. `localhost`); it is resolved and each
/// address is tried in turn.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener, ServerError> {
    let addr = settings.address();
    TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .map_err(|e| match e.kind() {
            io::ErrorKind::AddrInUse => ServerError::AddrInUse {
                addr: addr.clone(),
                port: settings.port,
            },
            _ => ServerError::Bind(format!("bind failed on {addr}: {e}")),
        })
}

/// Serve the dashboard on `listener` until `shutdown` resolves.
///
/// Returns `Ok(())` on clean shutdown.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Dashboard server listening");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Resolve when the process receives `Ctrl-C`.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Interrupt received, stopping server");
}
