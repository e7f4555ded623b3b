use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::{FeedFrame, RawTrade, Side, TrackedSymbols, TradeEvent, synthetic_wallet};

/// Map one decoded upstream frame into zero or more trade events.
///
/// Pure and stateless. Non-trade frames yield nothing; a bad record (numeric
/// field that fails to parse, untracked coin, out-of-range event time) is
/// skipped with a warning and never aborts the rest of the batch.
pub fn transform_frame(frame: FeedFrame, symbols: &TrackedSymbols) -> Vec<TradeEvent> {
    match frame {
        FeedFrame::Trades { data } => data
            .into_iter()
            .filter_map(|trade| transform_trade(trade, symbols))
            .collect(),
        FeedFrame::Other => Vec::new(),
    }
}

fn transform_trade(trade: RawTrade, symbols: &TrackedSymbols) -> Option<TradeEvent> {
    let Some(price) = numeric_field(&trade.px) else {
        tracing::warn!(tid = trade.tid, coin = %trade.coin, "skipping trade with unparsable price");
        return None;
    };
    let Some(size) = numeric_field(&trade.sz) else {
        tracing::warn!(tid = trade.tid, coin = %trade.coin, "skipping trade with unparsable size");
        return None;
    };
    if !symbols.contains(&trade.coin) {
        tracing::warn!(tid = trade.tid, coin = %trade.coin, "skipping trade for untracked coin");
        return None;
    }
    let Some(timestamp) = DateTime::from_timestamp_millis(trade.time) else {
        tracing::warn!(tid = trade.tid, time = trade.time, "skipping trade with out-of-range event time");
        return None;
    };

    let wallet = match trade.user {
        Some(user) if !user.is_empty() => user,
        _ => synthetic_wallet(),
    };

    // The upstream trade id alone can repeat across reconnects; the
    // generation timestamp disambiguates.
    let id = format!("{}-{}", trade.tid, Utc::now().timestamp_millis());

    Some(TradeEvent {
        id,
        timestamp,
        wallet,
        coin: trade.coin,
        side: Side::from_upstream_code(&trade.side),
        notional_value: price * size,
        price,
        size,
    })
}

/// Accept a numeric field encoded as a JSON number or a numeric string.
/// Negative values are rejected: price and size are non-negative by contract.
fn numeric_field(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.filter(|v| *v >= 0.0 && v.is_finite())
}
