use bytes::Bytes;
use dns_feed_domain::{ConnectionId, DomainError};

/// One serialized envelope as UTF-8 JSON. Clones share a single buffer, so
/// every connection it is delivered to gets the same bytes.
pub type Frame = Bytes;

/// What the broadcast hub needs from a live viewer connection.
///
/// Both operations are called from the hub's single loop and must return
/// immediately: `enqueue` hands the frame to the connection's own outbound
/// queue and `close` only signals the connection to tear itself down.
pub trait ViewerConnection: Send + Sync {
    fn id(&self) -> &ConnectionId;

    /// Non-blocking handoff; fails when the connection is closing or its
    /// outbound queue is full.
    fn enqueue(&self, frame: Frame) -> Result<(), DomainError>;

    /// Idempotent.
    fn close(&self);
}
