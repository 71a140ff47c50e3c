pub mod connection;
pub mod id_generator;

pub use connection::{ViewerHandle, ViewerSession, ViewerSettings};
pub use id_generator::ConnectionIdGenerator;
