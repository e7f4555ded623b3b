use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction, derived from the upstream single-letter aggressor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    /// Upstream encodes the aggressor as one letter: `"A"` (ask side) maps to
    /// SHORT, every other code maps to LONG.
    pub fn from_upstream_code(code: &str) -> Self {
        if code == "A" { Side::Short } else { Side::Long }
    }
}

/// Normalized trade event - the unit of data pushed to every subscriber.
///
/// Immutable once constructed. `notional_value` is always recomputed as
/// `price * size`, never trusted from upstream. Field names and `side` values
/// are part of the downstream wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub wallet: String,
    pub coin: String,
    pub side: Side,
    pub notional_value: f64,
    pub price: f64,
    pub size: f64,
}

/// Generate a placeholder wallet address for trades without counterparty data.
///
/// Presentation-only value (`0x` + 40 lowercase hex characters); not
/// identity-bearing, so weak randomness is sufficient.
pub fn synthetic_wallet() -> String {
    use rand::Rng;
    use std::fmt::Write;

    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes);

    let mut wallet = String::with_capacity(42);
    wallet.push_str("0x");
    for byte in bytes {
        let _ = write!(wallet, "{:02x}", byte);
    }
    wallet
}
