use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Broadcast hub counters
///
/// Written only by the hub loop (and by producers for admission drops), read
/// from anywhere. Reading never touches the registry itself.
#[derive(Clone, Default)]
pub struct HubMetrics {
    /// Connections currently in the registry
    connections: Arc<AtomicUsize>,

    /// Events that reached the hub loop
    published: Arc<AtomicU64>,

    /// Events discarded because nobody was connected
    discarded: Arc<AtomicU64>,

    /// Events abandoned at admission because the hub queue was full
    dropped: Arc<AtomicU64>,

    /// Frames handed to a connection's outbound queue
    delivered: Arc<AtomicU64>,

    /// Frames a connection refused
    failed_deliveries: Arc<AtomicU64>,
}

/// Point-in-time copy of [`HubMetrics`], serializable for the debug route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HubSnapshot {
    pub connections: usize,
    pub published: u64,
    pub discarded: u64,
    pub dropped: u64,
    pub delivered: u64,
    pub failed_deliveries: u64,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_connections(&self, count: usize) {
        self.connections.store(count, Ordering::Relaxed);
    }

    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivery(&self, ok: bool) {
        if ok {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_deliveries.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed_deliveries(&self) -> u64 {
        self.failed_deliveries.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            connections: self.connections(),
            published: self.published(),
            discarded: self.discarded(),
            dropped: self.dropped(),
            delivered: self.delivered(),
            failed_deliveries: self.failed_deliveries(),
        }
    }
}

impl std::fmt::Debug for HubMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubMetrics")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
