//! dns-feed domain layer
pub mod config;
pub mod connection_id;
pub mod errors;
pub mod events;

pub use config::{CliOverrides, Config, ConfigError};
pub use connection_id::ConnectionId;
pub use errors::DomainError;
pub use events::{escape_html, Envelope, EventKind, FeedEvent, ResolutionEvent, TextEvent};
