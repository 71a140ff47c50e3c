use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream resolution settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolver, `ip:port` (default: Cloudflare family filter)
    #[serde(default = "default_upstream")]
    pub upstream: String,

    /// Deadline for one upstream exchange, in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,

    /// Largest UDP payload accepted from askers and from the upstream
    #[serde(default = "default_udp_payload_size")]
    pub udp_payload_size: u16,
}

impl DnsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstream: default_upstream(),
            query_timeout: default_query_timeout(),
            udp_payload_size: default_udp_payload_size(),
        }
    }
}

fn default_upstream() -> String {
    "1.1.1.3:53".to_string()
}

fn default_query_timeout() -> u64 {
    10_000
}

fn default_udp_payload_size() -> u16 {
    4096
}
