use dns_feed_application::{Frame, ViewerConnection};
use dns_feed_domain::{ConnectionId, DomainError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock ViewerConnection
// ============================================================================

/// Records every frame it is handed instead of writing to a socket.
pub struct MockConnection {
    id: ConnectionId,
    frames: Mutex<Vec<Frame>>,
    attempts: AtomicUsize,
    closes: AtomicUsize,
    refuse: AtomicBool,
}

impl MockConnection {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::from(id),
            frames: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            refuse: AtomicBool::new(false),
        })
    }

    /// A connection whose outbound queue is permanently full.
    pub fn refusing(id: &str) -> Arc<Self> {
        let connection = Self::new(id);
        connection.refuse.store(true, Ordering::SeqCst);
        connection
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    pub fn received(&self) -> usize {
        self.frames.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }
}

impl ViewerConnection for MockConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    fn enqueue(&self, frame: Frame) -> Result<(), DomainError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(DomainError::OutboundQueueFull);
        }
        self.frames.lock().unwrap().push(frame);
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
