pub mod dns;
pub mod web;

use crate::bootstrap::ShutdownSignals;
use dns_feed_api::{create_app, AppState};
use dns_feed_application::{BroadcastHub, ShutdownCoordinator};
use dns_feed_domain::Config;
use tokio::sync::mpsc;
use tracing::{error, info};

pub use dns::bind_dns_listener;
pub use web::{bind_web_listener, serve_web};

/// Runs both listeners and the broadcast hub until a termination signal
/// arrives or a listener fails, then drains everything.
pub async fn run(config: Config, mut signals: ShutdownSignals) -> anyhow::Result<()> {
    let (hub, hub_task) = BroadcastHub::start(config.hub.queue_capacity);
    let mut coordinator = ShutdownCoordinator::new(config.shutdown.grace_period());
    coordinator.track_hub(hub.clone(), hub_task);
    let token = coordinator.token();

    let listeners = async {
        let dns = bind_dns_listener(&config, hub.clone()).await?;
        let web = bind_web_listener(&config).await?;
        anyhow::Ok((dns, web))
    };
    let (dns_listener, web_listener) = match listeners.await {
        Ok(listeners) => listeners,
        Err(e) => {
            error!(error = %e, "Failed to start listeners");
            coordinator.shutdown().await;
            return Err(e);
        }
    };

    let (failure_tx, mut failure_rx) = mpsc::channel::<anyhow::Error>(2);

    coordinator.track_listener("dns", tokio::spawn(dns_listener.serve(token.clone())));

    let app = create_app(AppState::new(hub.clone(), &config));
    coordinator.track_listener(
        "web",
        tokio::spawn(serve_web(web_listener, app, token.clone(), failure_tx)),
    );

    info!("dns-feed ready");

    let failure = tokio::select! {
        name = signals.recv() => {
            info!(signal = name, "Shutdown signal received");
            None
        }
        failure = failure_rx.recv() => failure,
    };

    coordinator.shutdown().await;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
