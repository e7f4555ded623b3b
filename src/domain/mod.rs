pub mod connection;
pub mod feed;
pub mod symbols;
pub mod trade;

pub use connection::{ConnectionHealth, ConnectionMonitor, ConnectionPhase};
pub use feed::{FeedFrame, RawTrade, SubscribeRequest};
pub use symbols::TrackedSymbols;
pub use trade::{Side, TradeEvent, synthetic_wallet};
