use super::forwarder::{QueryForwarder, ReplyWriter};
use async_trait::async_trait;
use dns_feed_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// UDP DNS listener; every datagram is handled on its own task.
pub struct DnsListener {
    socket: Arc<UdpSocket>,
    forwarder: Arc<QueryForwarder>,
    udp_payload_size: usize,
}

impl DnsListener {
    pub async fn bind(
        addr: SocketAddr,
        forwarder: Arc<QueryForwarder>,
        udp_payload_size: u16,
    ) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self {
            socket: Arc::new(socket),
            forwarder,
            udp_payload_size: udp_payload_size as usize,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serves queries until `token` is cancelled, then waits for the
    /// in-flight ones to finish.
    pub async fn serve(self, token: CancellationToken) {
        let local_addr = self.socket.local_addr().ok();
        info!(
            addr = ?local_addr,
            upstream = %self.forwarder.upstream(),
            "DNS listener started"
        );

        let tracker = TaskTracker::new();
        let mut buf = vec![0u8; self.udp_payload_size];

        loop {
            let received = tokio::select! {
                _ = token.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => received,
            };

            match received {
                Ok((len, peer)) => {
                    let query = buf[..len].to_vec();
                    let forwarder = Arc::clone(&self.forwarder);
                    let writer = UdpReplyWriter {
                        socket: Arc::clone(&self.socket),
                        peer,
                    };
                    tracker.spawn(async move {
                        forwarder.handle(&query, &writer).await;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "DNS listener: receive failed");
                }
            }
        }

        tracker.close();
        debug!(in_flight = tracker.len(), "DNS listener: draining in-flight queries");
        tracker.wait().await;
        info!("DNS listener stopped");
    }
}

struct UdpReplyWriter {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

#[async_trait]
impl ReplyWriter for UdpReplyWriter {
    async fn write_reply(&self, reply: &[u8]) -> Result<(), DomainError> {
        self.socket
            .send_to(reply, self.peer)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::Transport(format!("reply to {}: {}", self.peer, e)))
    }
}
