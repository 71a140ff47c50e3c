/// Shutdown Flow Tests
///
/// Termination drains both listeners and the broadcast hub within the
/// grace period.

#[path = "../common/mod.rs"]
mod common;

use common::{eventually, query_bytes, resolve, Frame, MockUpstream, TestStack};
use dns_feed_application::{BroadcastHub, ShutdownOutcome};
use dns_feed_domain::config::ResolutionOverflow;
use dns_feed_infrastructure::dns::{DnsListener, DnsTransport, QueryForwarder, UdpTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_shutdown_closes_viewers_and_stops_listeners() {
    // Arrange
    let upstream = MockUpstream::answering().await;
    let stack = TestStack::start(upstream.addr()).await;
    let mut viewer = stack.connect_viewer().await;
    assert!(eventually(|| stack.hub.metrics().connections() == 1).await);
    let web_addr = stack.web_addr;
    let dns_addr = stack.dns_addr;
    let hub = stack.hub.clone();

    // Act
    let outcome = stack.coordinator.shutdown().await;

    // Assert
    assert_eq!(outcome, ShutdownOutcome::Completed);
    assert!(!hub.is_running());

    let mut closed = false;
    while let Some(frame) = viewer.next_frame(WAIT).await {
        if matches!(frame, Frame::Close | Frame::Eof) {
            closed = true;
            break;
        }
    }
    assert!(closed, "viewer was not closed");

    assert!(TcpStream::connect(web_addr).await.is_err());
    assert!(resolve(dns_addr, &query_bytes(1, "example.com"), Duration::from_millis(200))
        .await
        .is_none());
}

#[tokio::test]
async fn test_in_flight_query_is_answered_during_shutdown() {
    // Arrange
    let upstream = MockUpstream::slow(Duration::from_millis(300)).await;
    let stack = TestStack::start(upstream.addr()).await;
    let dns_addr = stack.dns_addr;
    let client = tokio::spawn(async move {
        resolve(dns_addr, &query_bytes(0x4242, "example.com"), WAIT).await
    });
    assert!(eventually(|| upstream.queries_received() == 1).await);

    // Act
    let outcome = stack.coordinator.shutdown().await;

    // Assert
    assert_eq!(outcome, ShutdownOutcome::Completed);
    let reply = client.await.unwrap().expect("in-flight query was dropped");
    assert_eq!(&reply[0..2], &0x4242u16.to_be_bytes());
}

#[tokio::test]
async fn test_shutdown_with_nothing_connected_completes() {
    // Arrange
    let upstream = MockUpstream::answering().await;
    let stack = TestStack::start(upstream.addr()).await;

    // Act
    let outcome = stack.coordinator.shutdown().await;

    // Assert
    assert_eq!(outcome, ShutdownOutcome::Completed);
}

#[tokio::test]
async fn test_dns_listener_on_taken_port_fails_to_bind() {
    // Arrange
    let taken = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let (hub, _hub_task) = BroadcastHub::start(1);
    let transport: Arc<dyn DnsTransport> =
        Arc::new(UdpTransport::new("127.0.0.1:53".parse().unwrap(), 4096));
    let forwarder = Arc::new(QueryForwarder::new(
        transport,
        Duration::from_secs(1),
        hub,
        ResolutionOverflow::Drop,
    ));

    // Act
    let result = DnsListener::bind(taken.local_addr().unwrap(), forwarder, 4096).await;

    // Assert
    assert!(result.is_err());
}
