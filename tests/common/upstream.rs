use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

/// Loopback resolver answering every `A` query with one fixed record.
pub struct MockUpstream {
    addr: SocketAddr,
    received: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl MockUpstream {
    pub const ANSWER_IP: [u8; 4] = [93, 184, 216, 34];
    pub const ANSWER_TTL: u32 = 60;

    pub async fn answering() -> Self {
        Self::start(Some(Duration::ZERO)).await
    }

    /// Answers after `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::start(Some(delay)).await
    }

    /// Never answers.
    pub async fn silent() -> Self {
        Self::start(None).await
    }

    async fn start(delay: Option<Duration>) -> Self {
        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let addr = socket.local_addr().unwrap();
        let received = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&received);
        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, client)) = socket.recv_from(&mut buf).await else {
                    break;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let Some(delay) = delay else {
                    continue;
                };
                let query = buf[..len].to_vec();
                let socket = Arc::clone(&socket);
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let reply = a_response(&query, Self::ANSWER_IP, Self::ANSWER_TTL);
                    let _ = socket.send_to(&reply, client).await;
                });
            }
        });

        Self {
            addr,
            received,
            task,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.received.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Wire-format `A IN` query for `name` with RD set.
pub fn query_bytes(id: u16, name: &str) -> Vec<u8> {
    let mut query = Vec::with_capacity(64);
    query.extend_from_slice(&id.to_be_bytes());
    query.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    for label in name.trim_end_matches('.').split('.') {
        query.push(label.len() as u8);
        query.extend_from_slice(label.as_bytes());
    }
    query.push(0);
    query.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    query
}

/// Reply to a single-question `query` carrying one `A` record.
pub fn a_response(query: &[u8], ip: [u8; 4], ttl: u32) -> Vec<u8> {
    let mut response = Vec::with_capacity(query.len() + 16);
    response.extend_from_slice(&query[0..2]);
    response.extend_from_slice(&[0x81, 0x80]); // QR RD RA, NOERROR
    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..]);
    response.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01]);
    response.extend_from_slice(&ttl.to_be_bytes());
    response.extend_from_slice(&[0x00, 0x04]);
    response.extend_from_slice(&ip);
    response
}
