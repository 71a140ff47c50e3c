use anyhow::Context;
use axum::Router;
use dns_feed_domain::Config;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn bind_web_listener(config: &Config) -> anyhow::Result<TcpListener> {
    let addr = config.server.web_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind web listener on {}", addr))?;

    info!(bind_address = %addr, debug = config.server.debug, "Web listener bound");
    Ok(listener)
}

/// Serves the web app until `token` is cancelled. A server error cancels the
/// token for everyone else and is reported on `failures`.
pub async fn serve_web(
    listener: TcpListener,
    app: Router,
    token: CancellationToken,
    failures: mpsc::Sender<anyhow::Error>,
) {
    let shutdown = token.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    if let Err(e) = result {
        error!(error = %e, "Web server failed");
        let _ = failures.send(anyhow::Error::new(e).context("web server failed")).await;
        token.cancel();
    }

    info!("Web server stopped");
}
