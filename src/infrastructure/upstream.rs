use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::application::transform_frame;
use crate::domain::{ConnectionMonitor, ConnectionPhase, FeedFrame, SubscribeRequest, TrackedSymbols};
use crate::infrastructure::BroadcastHub;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Owns the single connection to the upstream trade feed.
///
/// Runs an unbounded reconnect loop: connect, subscribe to every tracked
/// symbol in configured order, pump inbound frames through the transformer
/// into the hub, and on any close or transport error wait a fixed delay and
/// start over. Server-side subscription state is never assumed to survive a
/// reconnect. The receive loop never waits on a subscriber.
pub struct UpstreamConnector {
    url: String,
    symbols: TrackedSymbols,
    hub: BroadcastHub,
    monitor: ConnectionMonitor,
    reconnect_delay: Duration,
}

impl UpstreamConnector {
    pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

    pub fn new(
        url: String,
        symbols: TrackedSymbols,
        hub: BroadcastHub,
        monitor: ConnectionMonitor,
    ) -> Self {
        UpstreamConnector {
            url,
            symbols,
            hub,
            monitor,
            reconnect_delay: Self::RECONNECT_DELAY,
        }
    }

    /// Override the fixed reconnect delay (tests).
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Drive the connection state machine until the shutdown flag flips.
    /// The pending reconnect delay is cancellable, so shutdown never waits
    /// out the timer.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            self.monitor.set_phase(ConnectionPhase::Connecting);
            tracing::info!(url = %self.url, "connecting to upstream feed");

            let session = tokio::select! {
                result = self.connect_and_subscribe() => result,
                _ = shutdown.changed() => break,
            };

            match session {
                Ok(stream) => {
                    self.monitor.set_phase(ConnectionPhase::Connected);
                    tracing::info!(
                        symbols = self.symbols.len(),
                        "upstream feed connected, subscriptions sent"
                    );

                    if self.pump(stream, &mut shutdown).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "upstream connection failed");
                    self.monitor.record_error(e.to_string());
                }
            }

            self.monitor.set_phase(ConnectionPhase::Reconnecting);
            tracing::warn!(delay = ?self.reconnect_delay, "scheduling upstream reconnect");
            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        self.monitor.set_phase(ConnectionPhase::Disconnected);
        tracing::info!("upstream connector stopped");
    }

    /// Handshake, then one subscribe request per tracked symbol in configured
    /// order. Any send failure here is a connection-level error.
    async fn connect_and_subscribe(&self) -> Result<WsStream, UpstreamError> {
        let (mut stream, _) = connect_async(&self.url).await?;

        for symbol in self.symbols.iter() {
            let request = serde_json::to_string(&SubscribeRequest::trades(symbol))?;
            stream.send(Message::Text(request.into())).await?;
            tracing::debug!(coin = symbol, "subscribed to trades");
        }

        Ok(stream)
    }

    /// Pump inbound frames until the connection ends or shutdown is
    /// requested. Returns true when shutting down.
    async fn pump(&self, mut stream: WsStream, shutdown: &mut watch::Receiver<bool>) -> bool {
        loop {
            let message = tokio::select! {
                message = stream.next() => message,
                _ = shutdown.changed() => {
                    let _ = stream.close(None).await;
                    return true;
                }
            };

            match message {
                Some(Ok(Message::Text(text))) => self.handle_frame(text.as_str()),
                Some(Ok(Message::Close(_))) | None => {
                    tracing::warn!("upstream connection closed");
                    return false;
                }
                // Pings are answered by the transport; pongs and binary
                // frames carry nothing we relay.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "upstream transport error");
                    self.monitor.record_error(e.to_string());
                    return false;
                }
            }
        }
    }

    /// Decode one text frame and fan the resulting events out. A frame that
    /// fails structural decode is dropped and recorded without touching the
    /// connection phase.
    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<FeedFrame>(text) {
            Ok(frame) => {
                for event in transform_frame(frame, &self.symbols) {
                    self.hub.broadcast(&event);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed upstream frame");
                self.monitor.record_error(format!("malformed frame: {e}"));
            }
        }
    }
}
