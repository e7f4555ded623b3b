pub mod hub;
pub mod upstream;

pub use hub::{BroadcastHub, SubscriberId};
pub use upstream::{UpstreamConnector, UpstreamError};
