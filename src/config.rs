use crate::domain::TrackedSymbols;

pub const DEFAULT_UPSTREAM_URL: &str = "wss://api.hyperliquid.xyz/ws";
pub const DEFAULT_TRACKED_COINS: [&str; 5] = ["BTC", "ETH", "XRP", "SOL", "DOGE"];

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Listen host for the HTTP/WebSocket server.
    pub host: String,
    /// Listen port for the HTTP/WebSocket server.
    pub port: u16,
    /// Upstream feed WebSocket URL.
    pub upstream_url: String,
    /// Symbols to subscribe to, in subscription order.
    pub tracked_symbols: TrackedSymbols,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            host: "0.0.0.0".to_string(),
            port: 3001,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            tracked_symbols: TrackedSymbols::new(DEFAULT_TRACKED_COINS),
        }
    }
}

impl RelayConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults: `HOST`, `PORT`, `UPSTREAM_URL`, `TRACKED_COINS`
    /// (comma-separated).
    pub fn from_env() -> Self {
        let defaults = RelayConfig::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);
        let upstream_url = std::env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url);
        let tracked_symbols = match std::env::var("TRACKED_COINS") {
            Ok(raw) => TrackedSymbols::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            ),
            Err(_) => defaults.tracked_symbols,
        };

        RelayConfig {
            host,
            port,
            upstream_url,
            tracked_symbols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = RelayConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.tracked_symbols.len(), 5);
        assert!(config.tracked_symbols.contains("BTC"));
    }
}
