use super::hub_metrics::HubMetrics;
use crate::ports::{Frame, ViewerConnection};
use dns_feed_domain::{ConnectionId, DomainError, Envelope, FeedEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Everything the hub loop accepts, processed strictly in arrival order.
pub enum HubMessage {
    Register(Arc<dyn ViewerConnection>),
    Deregister(ConnectionId),
    Publish(FeedEvent),
    Stop,
}

/// Handle to the broadcast hub.
///
/// The hub is a single task that owns the registry of live viewer
/// connections. Every registry change and every fan-out goes through its
/// bounded inbound queue, so the registry needs no lock.
///
/// ## Admission
///
/// - `register`, `deregister`, `publish` and `stop` wait for queue space.
/// - `try_publish` never waits: when the queue is full the event is
///   abandoned and counted as dropped. The resolution producer uses it so a
///   slow hub cannot delay DNS replies.
///
/// Once the hub loop has ended every admission fails fast with
/// `DomainError::HubUnavailable`.
///
/// ## Example
///
/// ```rust,ignore
/// let (hub, hub_task) = BroadcastHub::start(1);
/// hub.register(connection).await?;
/// hub.try_publish(resolution_event)?;
/// hub.stop().await?;
/// hub_task.await?;
/// ```
#[derive(Clone)]
pub struct BroadcastHub {
    tx: mpsc::Sender<HubMessage>,
    metrics: HubMetrics,
}

impl BroadcastHub {
    /// Spawns the hub loop with an inbound queue of `queue_capacity`
    /// messages (at least one).
    pub fn start(queue_capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = HubMetrics::new();
        let hub_loop = HubLoop {
            registry: HashMap::new(),
            metrics: metrics.clone(),
        };

        let handle = tokio::spawn(hub_loop.run(rx));
        (Self { tx, metrics }, handle)
    }

    pub async fn register(&self, connection: Arc<dyn ViewerConnection>) -> Result<(), DomainError> {
        self.admit(HubMessage::Register(connection)).await
    }

    pub async fn deregister(&self, id: ConnectionId) -> Result<(), DomainError> {
        self.admit(HubMessage::Deregister(id)).await
    }

    /// Publishes an event, waiting for queue space if the hub is behind.
    pub async fn publish(&self, event: impl Into<FeedEvent>) -> Result<(), DomainError> {
        self.admit(HubMessage::Publish(event.into())).await
    }

    /// Publishes an event only if the queue has room right now.
    pub fn try_publish(&self, event: impl Into<FeedEvent>) -> Result<(), DomainError> {
        match self.tx.try_send(HubMessage::Publish(event.into())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.metrics.record_dropped();
                Err(DomainError::HubQueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DomainError::HubUnavailable),
        }
    }

    /// Asks the hub to close every registered connection and end its loop.
    ///
    /// Returns once the request is queued; socket teardown happens inside
    /// each connection afterwards. Stopping an already stopped hub returns
    /// `HubUnavailable` and changes nothing.
    pub async fn stop(&self) -> Result<(), DomainError> {
        self.admit(HubMessage::Stop).await
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }

    pub fn metrics(&self) -> &HubMetrics {
        &self.metrics
    }

    async fn admit(&self, message: HubMessage) -> Result<(), DomainError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| DomainError::HubUnavailable)
    }
}

impl std::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("running", &self.is_running())
            .field("metrics", &self.metrics)
            .finish()
    }
}

struct HubLoop {
    registry: HashMap<ConnectionId, Arc<dyn ViewerConnection>>,
    metrics: HubMetrics,
}

impl HubLoop {
    async fn run(mut self, mut rx: mpsc::Receiver<HubMessage>) {
        debug!("BroadcastHub: loop started");

        while let Some(message) = rx.recv().await {
            match message {
                HubMessage::Register(connection) => self.register(connection),
                HubMessage::Deregister(id) => self.deregister(&id),
                HubMessage::Publish(event) => self.fan_out(event),
                HubMessage::Stop => {
                    self.stop();
                    break;
                }
            }
        }

        // Anything still queued behind Stop: connections that registered
        // too late are closed so they do not outlive the hub.
        rx.close();
        while let Ok(message) = rx.try_recv() {
            if let HubMessage::Register(connection) = message {
                debug!(conn_id = %connection.id(), "BroadcastHub: closing late registration");
                connection.close();
            }
        }

        self.metrics.set_connections(0);
        debug!("BroadcastHub: loop finished");
    }

    fn register(&mut self, connection: Arc<dyn ViewerConnection>) {
        let id = connection.id().clone();
        if self.registry.contains_key(&id) {
            debug!(conn_id = %id, "BroadcastHub: connection already registered");
            return;
        }

        self.registry.insert(id.clone(), connection);
        self.metrics.set_connections(self.registry.len());
        debug!(conn_id = %id, connections = self.registry.len(), "BroadcastHub: connection registered");
    }

    fn deregister(&mut self, id: &ConnectionId) {
        if self.registry.remove(id).is_none() {
            return;
        }

        self.metrics.set_connections(self.registry.len());
        debug!(conn_id = %id, connections = self.registry.len(), "BroadcastHub: connection deregistered");
    }

    fn fan_out(&mut self, event: FeedEvent) {
        self.metrics.record_published();

        if self.registry.is_empty() {
            self.metrics.record_discarded();
            return;
        }

        let kind = event.kind().as_str();
        let frame = match Envelope::wrap(&event).to_json() {
            Ok(json) => Frame::from(json),
            Err(e) => {
                error!(kind, error = %e, "BroadcastHub: failed to serialize event");
                return;
            }
        };

        for connection in self.registry.values() {
            let result = connection.enqueue(frame.clone());
            if let Err(e) = &result {
                warn!(
                    conn_id = %connection.id(),
                    kind,
                    error = %e,
                    "BroadcastHub: failed to deliver event"
                );
            }
            self.metrics.record_delivery(result.is_ok());
        }
    }

    fn stop(&mut self) {
        if self.registry.is_empty() {
            info!("BroadcastHub: stopping with no connections");
            return;
        }

        info!(
            connections = self.registry.len(),
            "BroadcastHub: stopping, closing all connections"
        );
        for (_, connection) in self.registry.drain() {
            connection.close();
        }
    }
}
