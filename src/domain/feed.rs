use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound subscription request, one per tracked symbol, sent immediately
/// after the upstream handshake completes.
///
/// Wire shape: `{"method":"subscribe","subscription":{"type":"trades","coin":"BTC"}}`
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    method: &'static str,
    subscription: Subscription,
}

#[derive(Debug, Clone, Serialize)]
struct Subscription {
    #[serde(rename = "type")]
    kind: &'static str,
    coin: String,
}

impl SubscribeRequest {
    pub fn trades(coin: &str) -> Self {
        SubscribeRequest {
            method: "subscribe",
            subscription: Subscription {
                kind: "trades",
                coin: coin.to_string(),
            },
        }
    }
}

/// Inbound frame from the upstream feed, tagged by its `channel` field.
///
/// Only trade batches carry data we relay; everything else (subscription
/// acks, pongs, unknown channels) decodes into `Other` and is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "channel")]
pub enum FeedFrame {
    #[serde(rename = "trades")]
    Trades { data: Vec<RawTrade> },
    #[serde(other)]
    Other,
}

/// One trade record as it arrives from the feed.
///
/// `px` and `sz` may arrive as JSON numbers or numeric strings, so they are
/// kept raw here; the transformer parses them and skips the single record on
/// failure instead of failing the whole frame.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrade {
    pub tid: u64,
    pub time: i64,
    #[serde(default)]
    pub user: Option<String>,
    pub coin: String,
    pub side: String,
    #[serde(default)]
    pub px: Value,
    #[serde(default)]
    pub sz: Value,
}
