#![allow(dead_code)]

mod mock_connection;

pub use mock_connection::MockConnection;

use std::time::Duration;

/// Polls `condition` until it holds or a second has passed.
pub async fn eventually<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), async {
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
