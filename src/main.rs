use trade_relay::{Relay, RelayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trade_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env();
    tracing::info!("upstream feed: {}", config.upstream_url);
    tracing::info!("tracked symbols: {:?}", config.tracked_symbols.as_slice());
    tracing::info!(
        "subscriber endpoint: ws://{}:{}/ws",
        config.host,
        config.port
    );
    tracing::info!("health endpoint: http://{}:{}/health", config.host, config.port);

    Relay::new(config).run().await
}
