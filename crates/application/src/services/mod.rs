pub mod broadcast_hub;
pub mod hub_metrics;
pub mod shutdown_coordinator;

pub use broadcast_hub::{BroadcastHub, HubMessage};
pub use hub_metrics::{HubMetrics, HubSnapshot};
pub use shutdown_coordinator::{ShutdownCoordinator, ShutdownOutcome};
