#![allow(dead_code)]

mod builders;
mod dns_server_mock;

pub use builders::{a_response, query_bytes, DnsServerBuilder};
pub use dns_server_mock::{MockDnsServer, UpstreamBehavior};
pub use mocks::{MockTransport, RecordingViewer, RecordingWriter};

use std::time::Duration;

/// Polls `condition` until it holds or two seconds have passed.
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}
