use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;

use crate::infrastructure::BroadcastHub;

/// Shared state for the subscriber WebSocket endpoint.
pub struct WsState {
    pub hub: BroadcastHub,
    pub shutdown: watch::Receiver<bool>,
}

/// Handle WebSocket upgrade for a new subscriber.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Service one subscriber connection for its lifetime: join the hub, forward
/// every queued event to the socket, leave on close or shutdown.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut sender, mut receiver) = socket.split();
    let (id, mut events) = state.hub.join();
    tracing::info!(subscriber = %id, "subscriber connected");

    // Forward hub events to the socket. Ends when the hub drops this queue
    // or the socket rejects a send; the hub then removes the subscriber
    // lazily on its next broadcast.
    let send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "failed to serialize trade event");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Subscribers drive no protocol; inbound messages are logged and ignored
    // until the peer closes or the relay shuts down.
    let mut shutdown = state.shutdown.clone();
    loop {
        tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(subscriber = %id, payload = %text.as_str(), "message from subscriber");
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            _ = shutdown.changed() => break,
        }
    }

    state.hub.leave(id);
    // Leaving drops the queue sender, so the forwarding task drains and
    // exits on its own.
    let _ = send_task.await;
    tracing::info!(subscriber = %id, "subscriber disconnected");
}
