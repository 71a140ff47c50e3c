pub mod udp;

use async_trait::async_trait;
use dns_feed_domain::DomainError;
use std::time::Duration;

pub use udp::UdpTransport;

/// Result of one upstream exchange
#[derive(Debug)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Vec<u8>,
    /// Time from sending the query to receiving the matching response
    pub rtt: Duration,
}

/// Sends a raw DNS message to the upstream resolver and waits for its answer.
///
/// `timeout` bounds the whole exchange; expiry is reported as
/// `DomainError::TransportTimeout`.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    /// Upstream identity as reported in resolution events.
    fn upstream(&self) -> String;
}
