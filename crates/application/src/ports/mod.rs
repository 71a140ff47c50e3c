pub mod viewer_connection;

pub use viewer_connection::{Frame, ViewerConnection};
