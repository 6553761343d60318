//! API server lifecycle: bind, serve the router, stop on signal.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::report_api_router;
use crate::config::SESSION_SWEEP_PERIOD;
use crate::core_state::CoreState;

/// Serve the report API on `addr` until `shutdown` resolves.
pub async fn serve(
    core: Arc<CoreState>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    let sweep = core.spawn_idle_sweep(SESSION_SWEEP_PERIOD);
    let app = report_api_router(core);

    tracing::info!(addr = %local, "Report API server started");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    sweep.abort();
    served?;
    tracing::info!("Report API server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
