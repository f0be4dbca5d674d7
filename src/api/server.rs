//! HTTP server lifecycle for the patient record service.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel. The binary keeps the handle alive until ctrl-c; tests use it to
//! stop the server deterministically.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::patient_api_router;
use crate::db::SqlitePool;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the API server on `addr` over the given pool.
///
/// Binds the listener, mounts `patient_api_router`, and spawns the axum
/// server in a background tokio task. Returns an `ApiServer` handle carrying
/// the bound address (useful with port 0) and a shutdown channel.
pub async fn start_api_server(
    pool: SqlitePool,
    addr: SocketAddr,
) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "API server binding");

    let app = patient_api_router(pool);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}
