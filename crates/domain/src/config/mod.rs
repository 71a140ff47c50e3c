//! Configuration module for dns-feed
//!
//! Structures are grouped by the component they tune:
//! - `root`: top-level configuration, file loading and CLI overrides
//! - `server`: listening addresses and the debug toggle
//! - `dns`: upstream resolver and exchange limits
//! - `viewer`: per-connection limits for real-time viewers
//! - `hub`: broadcast hub queue sizing and overflow policy
//! - `shutdown`: grace period for draining listeners
//! - `logging`: log level
//! - `errors`: configuration errors

pub mod dns;
pub mod errors;
pub mod hub;
pub mod logging;
pub mod root;
pub mod server;
pub mod shutdown;
pub mod viewer;

pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use hub::{HubConfig, ResolutionOverflow};
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use shutdown::ShutdownConfig;
pub use viewer::ViewerConfig;
