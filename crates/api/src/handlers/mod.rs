pub mod debug;
pub mod health;
pub mod index;
pub mod viewer;

pub use debug::hub_metrics;
pub use health::health_check;
pub use index::{index, redirect_to_index};
pub use viewer::viewer_socket;
