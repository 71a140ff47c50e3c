use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_web_port")]
    pub web_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Exposes `/debug/hub` on the web listener.
    #[serde(default)]
    pub debug: bool,
}

impl ServerConfig {
    /// UDP address of the DNS listener.
    pub fn dns_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.dns_port))
    }

    /// TCP address of the web listener.
    pub fn web_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.web_port))
    }

    fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "invalid bind_address '{}': {}",
                self.bind_address, e
            ))
        })
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_web_port() -> u16 {
    54321
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            web_port: default_web_port(),
            bind_address: default_bind_address(),
            debug: false,
        }
    }
}
