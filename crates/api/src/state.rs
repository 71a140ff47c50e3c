use dns_feed_application::BroadcastHub;
use dns_feed_domain::Config;
use dns_feed_infrastructure::viewer::{ConnectionIdGenerator, ViewerSettings};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub hub: BroadcastHub,
    pub ids: Arc<ConnectionIdGenerator>,
    pub viewer: ViewerSettings,
    pub handshake_timeout: Duration,
    /// Exposes `/debug/hub`
    pub debug: bool,
}

impl AppState {
    pub fn new(hub: BroadcastHub, config: &Config) -> Self {
        Self {
            hub,
            ids: Arc::new(ConnectionIdGenerator::new()),
            viewer: ViewerSettings::from(&config.viewer),
            handshake_timeout: config.viewer.handshake_timeout(),
            debug: config.server.debug,
        }
    }
}
