use super::broadcast_hub::BroadcastHub;
use futures::future::join_all;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every listener and the hub finished inside the grace period.
    Completed,
    /// The grace period expired first; whatever is left is abandoned.
    TimedOut,
}

/// Drains the listeners and the broadcast hub on process termination.
///
/// Listeners watch the shared [`CancellationToken`]: once it is cancelled
/// they stop accepting new work and finish what is in flight. The hub is
/// sent `Stop` at the same time, which closes every viewer connection.
/// `shutdown` waits for all of it up to the grace period and then returns
/// either way.
///
/// ## Example
///
/// ```rust,ignore
/// let mut coordinator = ShutdownCoordinator::new(Duration::from_secs(3));
/// coordinator.track_hub(hub.clone(), hub_task);
/// coordinator.track_listener("dns", tokio::spawn(dns.serve(coordinator.token())));
///
/// shutdown_signal().await;
/// coordinator.shutdown().await;
/// ```
pub struct ShutdownCoordinator {
    token: CancellationToken,
    grace: Duration,
    listeners: Vec<(&'static str, JoinHandle<()>)>,
    hub: Option<(BroadcastHub, JoinHandle<()>)>,
}

impl ShutdownCoordinator {
    pub fn new(grace: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            grace,
            listeners: Vec::new(),
            hub: None,
        }
    }

    /// Token the listeners watch; cancelling it also lets a failing
    /// listener trigger shutdown of the others.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn track_listener(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.listeners.push((name, handle));
    }

    pub fn track_hub(&mut self, hub: BroadcastHub, handle: JoinHandle<()>) {
        self.hub = Some((hub, handle));
    }

    pub async fn shutdown(self) -> ShutdownOutcome {
        let Self {
            token,
            grace,
            listeners,
            hub,
        } = self;

        info!(
            grace_ms = grace.as_millis() as u64,
            listeners = listeners.len(),
            "Shutdown: stopping listeners and broadcast hub"
        );
        token.cancel();

        let stop_hub = async move {
            if let Some((hub, handle)) = hub {
                if hub.stop().await.is_err() {
                    debug!("Shutdown: broadcast hub was already stopped");
                }
                wait_for("hub", handle).await;
            }
        };
        let stop_listeners = join_all(
            listeners
                .into_iter()
                .map(|(name, handle)| wait_for(name, handle)),
        );

        let drain = async move {
            tokio::join!(stop_hub, stop_listeners);
        };

        match tokio::time::timeout(grace, drain).await {
            Ok(()) => {
                info!("Shutdown: complete");
                ShutdownOutcome::Completed
            }
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Shutdown: timed out before every component settled"
                );
                ShutdownOutcome::TimedOut
            }
        }
    }
}

async fn wait_for(component: &'static str, handle: JoinHandle<()>) {
    match handle.await {
        Ok(()) => debug!(component, "Shutdown: component stopped"),
        Err(e) => warn!(component, error = %e, "Shutdown: component task failed"),
    }
}
