use super::{
    ConfigError, DnsConfig, HubConfig, LoggingConfig, ServerConfig, ShutdownConfig, ViewerConfig,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub shutdown: ShutdownConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub web_port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream: Option<String>,
    pub log_level: Option<String>,
    pub debug: bool,
}

impl Config {
    /// Reads the TOML file at `path` (defaults when `None`) and applies
    /// the command-line overrides on top.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
                    path: path.to_string(),
                    source,
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(upstream) = overrides.upstream {
            self.dns.upstream = upstream;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.debug {
            self.server.debug = true;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.upstream_addr()?;
        self.server.dns_addr()?;

        // DNS is UDP and the web listener TCP, so sharing a port number is fine.
        if self.server.dns_port == 0 || self.server.web_port == 0 {
            return Err(ConfigError::Validation("ports must be non-zero".to_string()));
        }
        if self.dns.udp_payload_size < 512 {
            return Err(ConfigError::Validation(format!(
                "udp_payload_size must be at least 512, got {}",
                self.dns.udp_payload_size
            )));
        }

        let durations = [
            ("dns.query_timeout", self.dns.query_timeout),
            ("viewer.write_timeout", self.viewer.write_timeout),
            ("viewer.ping_period", self.viewer.ping_period),
            ("viewer.handshake_timeout", self.viewer.handshake_timeout),
            ("shutdown.grace_period", self.shutdown.grace_period),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::Validation(format!("{} must be greater than 0", name)));
        }

        if self.viewer.max_message_size == 0 {
            return Err(ConfigError::Validation(
                "viewer.max_message_size must be greater than 0".to_string(),
            ));
        }
        if self.viewer.outbound_queue == 0 || self.hub.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "queue capacities must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upstream_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.dns.upstream.parse().map_err(|e| {
            ConfigError::Validation(format!("invalid upstream '{}': {}", self.dns.upstream, e))
        })
    }
}
