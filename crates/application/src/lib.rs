//! dns-feed application layer
//!
//! Holds the broadcast hub that serializes registry changes and event
//! fan-out, and the shutdown coordinator that drains everything on exit.
pub mod ports;
pub mod services;

pub use ports::{Frame, ViewerConnection};
pub use services::{
    BroadcastHub, HubMetrics, HubSnapshot, ShutdownCoordinator, ShutdownOutcome,
};
