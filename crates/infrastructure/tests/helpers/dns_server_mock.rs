use super::builders::a_response;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock upstream reacts to each query
#[derive(Debug, Clone, Copy)]
pub enum UpstreamBehavior {
    /// Answers with one A record (93.184.216.34, TTL 60)
    Answer,
    /// Answers after the given delay
    AnswerAfter(Duration),
    /// Sends a response with the wrong transaction id first, then the real one
    WrongIdFirst,
    /// Never answers
    Silent,
}

/// Mock upstream DNS server on loopback
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: UpstreamBehavior) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                let (len, peer) = tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => match result {
                        Ok(received) => received,
                        Err(_) => continue,
                    },
                };

                counter.fetch_add(1, Ordering::SeqCst);
                if len < 12 {
                    continue;
                }
                let response = a_response(&buf[..len], [93, 184, 216, 34], 60);

                match behavior {
                    UpstreamBehavior::Answer => {
                        let _ = socket.send_to(&response, peer).await;
                    }
                    UpstreamBehavior::AnswerAfter(delay) => {
                        tokio::time::sleep(delay).await;
                        let _ = socket.send_to(&response, peer).await;
                    }
                    UpstreamBehavior::WrongIdFirst => {
                        let mut wrong = response.clone();
                        wrong[0] ^= 0xff;
                        let _ = socket.send_to(&wrong, peer).await;
                        let _ = socket.send_to(&response, peer).await;
                    }
                    UpstreamBehavior::Silent => {}
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
