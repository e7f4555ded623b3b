//! Trade Relay
//!
//! A real-time market-data relay: one upstream WebSocket connection to an
//! exchange trade feed, normalized into stable trade events and fanned out to
//! any number of downstream WebSocket subscribers.
//!
//! # Architecture
//!
//! The crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Core data types and invariants (TradeEvent, TrackedSymbols,
//!   ConnectionHealth, feed wire types)
//! - **Application**: The pure normalization pipeline and the status read model
//! - **Infrastructure**: The upstream connector and the broadcast hub
//! - **Presentation**: Health endpoint and subscriber WebSocket handlers
//!
//! ```text
//! ┌──────────────┐   frames   ┌─────────────┐   events   ┌──────────────┐
//! │  Upstream    │ ─────────▶ │ Transformer │ ─────────▶ │ BroadcastHub │
//! │  Connector   │            └─────────────┘            └──────┬───────┘
//! └──────┬───────┘                                              │ fan-out
//!        │ phase + last error                                   ▼
//!        ▼                                              ┌──────────────┐
//! ┌──────────────┐      GET /health                     │ Subscribers  │
//! │ RelayStatus  │ ◀─────────────────                   │  (WebSocket) │
//! └──────────────┘                                      └──────────────┘
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export key types
pub use application::{RelayStatus, StatusSnapshot, transform_frame};
pub use config::RelayConfig;
pub use domain::{
    ConnectionHealth, ConnectionMonitor, ConnectionPhase, FeedFrame, Side, SubscribeRequest,
    TrackedSymbols, TradeEvent, synthetic_wallet,
};
pub use infrastructure::{BroadcastHub, SubscriberId, UpstreamConnector, UpstreamError};
pub use presentation::{WsState, health, ws_handler};

use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

/// The relay server: owns the broadcast hub, the connection monitor, and the
/// status read model, and wires them to the HTTP/WebSocket surfaces and the
/// upstream connector task.
pub struct Relay {
    pub config: RelayConfig,
    pub hub: BroadcastHub,
    pub monitor: ConnectionMonitor,
    pub status: Arc<RelayStatus>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        let hub = BroadcastHub::new();
        let monitor = ConnectionMonitor::new();
        let status = Arc::new(RelayStatus::new(
            monitor.clone(),
            config.tracked_symbols.clone(),
            hub.clone(),
        ));

        Relay {
            config,
            hub,
            monitor,
            status,
        }
    }

    /// Build the HTTP router: health endpoint plus the subscriber WebSocket,
    /// with a permissive CORS layer for the dashboard.
    pub fn router(&self, shutdown: watch::Receiver<bool>) -> Router {
        let ws_state = Arc::new(WsState {
            hub: self.hub.clone(),
            shutdown,
        });

        let rest = Router::new()
            .route("/health", get(health))
            .with_state(Arc::clone(&self.status));
        let ws = Router::new()
            .route("/ws", get(ws_handler))
            .with_state(ws_state);

        rest.merge(ws).layer(CorsLayer::permissive())
    }

    /// Build the upstream connector wired to this relay's hub and monitor.
    pub fn connector(&self) -> UpstreamConnector {
        UpstreamConnector::new(
            self.config.upstream_url.clone(),
            self.config.tracked_symbols.clone(),
            self.hub.clone(),
            self.monitor.clone(),
        )
    }

    /// Run the relay until ctrl-c / SIGTERM: serves the HTTP/WebSocket
    /// surface and drives the upstream connection task. Shutdown is
    /// cooperative: stop accepting subscribers, close the upstream socket,
    /// then tear down every subscriber queue.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("relay listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received, closing connections");
                let _ = shutdown_tx.send(true);
            }
        });

        let upstream = tokio::spawn(self.connector().run(shutdown_rx.clone()));

        let router = self.router(shutdown_rx.clone());
        let mut server_shutdown = shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.changed().await;
            })
            .await?;

        let _ = upstream.await;
        self.hub.close_all();
        tracing::info!("relay stopped");

        Ok(())
    }
}
