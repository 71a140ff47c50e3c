use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use dns_feed_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::debug;

/// DNS over UDP, one ephemeral socket per exchange.
pub struct UdpTransport {
    server_addr: SocketAddr,
    max_response_size: usize,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr, max_response_size: u16) -> Self {
        Self {
            server_addr,
            max_response_size: max_response_size as usize,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::Transport(format!("Failed to bind UDP socket: {}", e)))?;

        // Connected socket: datagrams from any other source are filtered by the kernel.
        socket.connect(self.server_addr).await.map_err(|e| {
            DomainError::Transport(format!("Failed to connect to {}: {}", self.server_addr, e))
        })?;

        let bytes_sent = socket.send(message_bytes).await.map_err(|e| {
            DomainError::Transport(format!(
                "Failed to send UDP query to {}: {}",
                self.server_addr, e
            ))
        })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; self.max_response_size];
        loop {
            let bytes_received = socket.recv(&mut recv_buf).await.map_err(|e| {
                DomainError::Transport(format!(
                    "Failed to receive UDP response from {}: {}",
                    self.server_addr, e
                ))
            })?;

            if bytes_received < 2 || recv_buf[..2] != message_bytes[..2] {
                debug!(
                    server = %self.server_addr,
                    bytes_received,
                    "Ignoring UDP response with mismatched transaction id"
                );
                continue;
            }

            recv_buf.truncate(bytes_received);
            debug!(server = %self.server_addr, bytes_received, "UDP response received");
            return Ok(recv_buf);
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        if message_bytes.len() < 2 {
            return Err(DomainError::InvalidDnsMessage(
                "query shorter than a transaction id".to_string(),
            ));
        }

        let started = Instant::now();
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout(self.server_addr.to_string()))??;

        Ok(TransportResponse {
            bytes,
            rtt: started.elapsed(),
        })
    }

    fn upstream(&self) -> String {
        self.server_addr.to_string()
    }
}
