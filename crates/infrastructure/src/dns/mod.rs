pub mod forwarder;
pub mod forwarding;
pub mod listener;
pub mod transport;

pub use forwarder::{QueryForwarder, ReplyWriter};
pub use listener::DnsListener;
pub use transport::{DnsTransport, TransportResponse, UdpTransport};
