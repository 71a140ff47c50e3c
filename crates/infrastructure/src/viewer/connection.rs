//! Connection actor for one real-time viewer.
//!
//! The actor owns the duplex channel and runs two loops over it:
//!
//! - the **write loop** (its own task) drains the outbound queue and sends a
//!   keepalive ping every `ping_period`, each write bounded by
//!   `write_timeout`;
//! - the **read loop** turns inbound text into `TextEvent`s for the hub and
//!   ignores every other frame type.
//!
//! Either loop ending stops the other. Once both are done the actor
//! deregisters from the hub and closes the socket. The hub only ever sees the
//! [`ViewerHandle`], which can enqueue frames and request a close without
//! touching the socket.

use axum::extract::ws::{Message, Utf8Bytes};
use bytes::Bytes;
use dns_feed_application::{BroadcastHub, Frame, ViewerConnection};
use dns_feed_domain::config::ViewerConfig;
use dns_feed_domain::{ConnectionId, DomainError, TextEvent};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-connection limits, taken from `[viewer]` in the config file.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub write_timeout: Duration,
    pub ping_period: Duration,
    pub max_message_size: usize,
    pub outbound_queue: usize,
}

impl From<&ViewerConfig> for ViewerSettings {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            write_timeout: config.write_timeout(),
            ping_period: config.ping_period(),
            max_message_size: config.max_message_size,
            outbound_queue: config.outbound_queue,
        }
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

/// The hub-facing side of a connection actor.
pub struct ViewerHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<Frame>,
    stop: CancellationToken,
}

impl ViewerConnection for ViewerHandle {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    fn enqueue(&self, frame: Frame) -> Result<(), DomainError> {
        if self.stop.is_cancelled() {
            return Err(DomainError::ConnectionClosed);
        }

        self.outbound.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DomainError::OutboundQueueFull,
            TrySendError::Closed(_) => DomainError::ConnectionClosed,
        })
    }

    fn close(&self) {
        self.stop.cancel();
    }
}

/// Runs one viewer connection to completion.
pub struct ViewerSession;

impl ViewerSession {
    /// Drives the connection until either side gives up or the hub closes it.
    ///
    /// `sink` and `stream` are the two halves of the upgraded socket.
    pub async fn run<S, R, E>(
        id: ConnectionId,
        sink: S,
        stream: R,
        hub: BroadcastHub,
        settings: ViewerSettings,
    ) where
        S: Sink<Message> + Unpin + Send + 'static,
        S::Error: Display + Send,
        R: Stream<Item = Result<Message, E>> + Unpin + Send,
        E: Display + Send,
    {
        let (outbound_tx, outbound_rx) = mpsc::channel(settings.outbound_queue.max(1));
        let stop = CancellationToken::new();
        let handle = Arc::new(ViewerHandle {
            id: id.clone(),
            outbound: outbound_tx,
            stop: stop.clone(),
        });

        info!(conn_id = %id, "Viewer connected");

        let writer = tokio::spawn(write_loop(
            id.clone(),
            sink,
            outbound_rx,
            stop.clone(),
            settings.clone(),
        ));

        if hub.register(handle.clone()).await.is_err() {
            debug!(conn_id = %id, "Hub is not running; closing viewer");
            handle.close();
        }

        read_loop(&id, stream, &hub, &stop, settings.max_message_size).await;
        stop.cancel();

        let sink = match writer.await {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(conn_id = %id, error = %e, "Viewer write loop failed");
                None
            }
        };

        // Fails only once the hub has stopped, and then the registry is gone anyway.
        let _ = hub.deregister(id.clone()).await;

        if let Some(mut sink) = sink {
            let close = async {
                let _ = sink.send(Message::Close(None)).await;
                let _ = sink.close().await;
            };
            let _ = tokio::time::timeout(settings.write_timeout, close).await;
        }

        info!(conn_id = %id, "Viewer disconnected");
    }
}

async fn read_loop<R, E>(
    id: &ConnectionId,
    mut stream: R,
    hub: &BroadcastHub,
    stop: &CancellationToken,
    max_message_size: usize,
) where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        let next = tokio::select! {
            _ = stop.cancelled() => break,
            next = stream.next() => next,
        };

        let text = match next {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                debug!(conn_id = %id, "Viewer closed the connection");
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                debug!(conn_id = %id, error = %e, "Viewer read failed");
                break;
            }
        };

        let size = text.as_str().len();
        if size > max_message_size {
            warn!(conn_id = %id, size, limit = max_message_size, "Viewer message too large");
            break;
        }

        let event = TextEvent::from_raw(id.clone(), text.as_str());
        if hub.publish(event).await.is_err() {
            break;
        }
    }
}

async fn write_loop<S>(
    id: ConnectionId,
    mut sink: S,
    mut outbound: mpsc::Receiver<Frame>,
    stop: CancellationToken,
    settings: ViewerSettings,
) -> S
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut ping = tokio::time::interval_at(
        Instant::now() + settings.ping_period,
        settings.ping_period,
    );
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let message = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = ping.tick() => Message::Ping(Bytes::new()),
            frame = outbound.recv() => match frame {
                Some(frame) => match Utf8Bytes::try_from(frame) {
                    Ok(text) => Message::Text(text),
                    Err(e) => {
                        warn!(conn_id = %id, error = %e, "Dropping frame that is not UTF-8");
                        continue;
                    }
                },
                None => break,
            },
        };

        match tokio::time::timeout(settings.write_timeout, sink.send(message)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(conn_id = %id, error = %e, "Viewer write failed");
                break;
            }
            Err(_) => {
                warn!(
                    conn_id = %id,
                    timeout_ms = settings.write_timeout.as_millis() as u64,
                    "Viewer write timed out"
                );
                break;
            }
        }
    }

    stop.cancel();
    sink
}
