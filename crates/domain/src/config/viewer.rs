use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to every real-time viewer connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    /// Deadline for each outbound write (data or ping), in milliseconds
    #[serde(default = "default_write_timeout")]
    pub write_timeout: u64,

    /// Keepalive ping period, in milliseconds
    #[serde(default = "default_ping_period")]
    pub ping_period: u64,

    /// Deadline for the upgrade request, in milliseconds
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout: u64,

    /// Largest inbound message accepted from a viewer, in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Frames buffered per connection before enqueue reports it full
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl ViewerConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout)
    }

    pub fn ping_period(&self) -> Duration {
        Duration::from_millis(self.ping_period)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            write_timeout: default_write_timeout(),
            ping_period: default_ping_period(),
            handshake_timeout: default_handshake_timeout(),
            max_message_size: default_max_message_size(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

fn default_write_timeout() -> u64 {
    5_000
}

fn default_ping_period() -> u64 {
    5_000
}

fn default_handshake_timeout() -> u64 {
    5_000
}

fn default_max_message_size() -> usize {
    1024
}

fn default_outbound_queue() -> usize {
    16
}
