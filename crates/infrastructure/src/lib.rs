//! dns-feed infrastructure layer
//!
//! Adapters around the application core: the UDP upstream transport, the
//! DNS listener and resolution producer, and the WebSocket connection actor.
pub mod dns;
pub mod viewer;
