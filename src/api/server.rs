//! Listener setup and graceful shutdown, shared by both front ends.

use axum::Router;
use tokio::net::TcpListener;

use crate::common::config::AppCfg;
use crate::common::error::{DiabError, DiabResult};

/// Bind `cfg.bind_addr()` and serve `app` until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, cfg: &AppCfg) -> DiabResult<()> {
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await.map_err(DiabError::Server)?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(DiabError::Server)?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
