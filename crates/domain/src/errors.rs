use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Upstream exchange with {0} timed out")]
    TransportTimeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Outbound queue is full")]
    OutboundQueueFull,

    #[error("Broadcast hub is not running")]
    HubUnavailable,

    #[error("Broadcast hub queue is full")]
    HubQueueFull,
}
