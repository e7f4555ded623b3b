//! Subscriber-facing integration tests
//!
//! Start the real router on an ephemeral port and exercise the health
//! endpoint and the subscriber WebSocket with real clients.

use chrono::DateTime;
use futures_util::StreamExt;
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use trade_relay::{BroadcastHub, Relay, RelayConfig, Side, TrackedSymbols, TradeEvent};

// ============================================================================
// Test Fixtures
// ============================================================================

async fn start_server() -> (SocketAddr, BroadcastHub, watch::Sender<bool>) {
    let config = RelayConfig {
        host: "127.0.0.1".to_string(),
        tracked_symbols: TrackedSymbols::new(["BTC", "ETH"]),
        ..RelayConfig::default()
    };
    let relay = Relay::new(config);
    let hub = relay.hub.clone();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let router = relay.router(shutdown_rx);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, hub, shutdown_tx)
}

fn make_event(id: &str) -> TradeEvent {
    TradeEvent {
        id: id.to_string(),
        timestamp: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        wallet: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
        coin: "BTC".to_string(),
        side: Side::Short,
        notional_value: 6500.05,
        price: 65000.5,
        size: 0.1,
    }
}

async fn wait_for(mut condition: impl FnMut() -> bool, what: &str) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {what}");
}

async fn recv_text(
    stream: &mut (impl futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
              + Unpin),
) -> String {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream closed")
            .expect("message error");
        if let Message::Text(text) = message {
            return text.as_str().to_string();
        }
    }
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_snapshot() {
    let (addr, _hub, _shutdown) = start_server().await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["connectionStatus"], "disconnected");
    assert_eq!(body["trackedCoins"], serde_json::json!(["BTC", "ETH"]));
    assert_eq!(body["connectedClients"], 0);
    assert!(body["uptime"].is_u64());
}

#[tokio::test]
async fn test_health_counts_connected_clients() {
    let (addr, hub, _shutdown) = start_server().await;

    let (_ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    wait_for(|| hub.subscriber_count() == 1, "subscriber to register").await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["connectedClients"], 1);
}

// ============================================================================
// Subscriber WebSocket Tests
// ============================================================================

#[tokio::test]
async fn test_subscriber_receives_broadcast_as_json() {
    let (addr, hub, _shutdown) = start_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    wait_for(|| hub.subscriber_count() == 1, "subscriber to register").await;

    hub.broadcast(&make_event("42-1700000000000"));

    let text = recv_text(&mut ws).await;
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["id"], "42-1700000000000");
    assert_eq!(json["coin"], "BTC");
    assert_eq!(json["side"], "SHORT");
    assert_eq!(json["price"], 65000.5);
    assert_eq!(json["size"], 0.1);
    assert_eq!(json["notionalValue"], 6500.05);
    assert_eq!(
        json["wallet"],
        "0x1234567890abcdef1234567890abcdef12345678"
    );
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_departing_subscriber_does_not_affect_others() {
    let (addr, hub, _shutdown) = start_server().await;

    let (mut ws1, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    let (mut ws2, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    wait_for(|| hub.subscriber_count() == 2, "both subscribers").await;

    hub.broadcast(&make_event("first"));
    assert_eq!(
        serde_json::from_str::<Value>(&recv_text(&mut ws1).await).unwrap()["id"],
        "first"
    );

    // Subscriber 1 goes away; subscriber 2 keeps receiving in order.
    drop(ws1);
    wait_for(|| hub.subscriber_count() == 1, "departed subscriber removal").await;

    hub.broadcast(&make_event("second"));
    assert_eq!(
        serde_json::from_str::<Value>(&recv_text(&mut ws2).await).unwrap()["id"],
        "first"
    );
    assert_eq!(
        serde_json::from_str::<Value>(&recv_text(&mut ws2).await).unwrap()["id"],
        "second"
    );
}

#[tokio::test]
async fn test_events_arrive_in_production_order() {
    let (addr, hub, _shutdown) = start_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    wait_for(|| hub.subscriber_count() == 1, "subscriber to register").await;

    for i in 0..10 {
        hub.broadcast(&make_event(&format!("event-{i}")));
    }
    for i in 0..10 {
        let json: Value = serde_json::from_str(&recv_text(&mut ws).await).unwrap();
        assert_eq!(json["id"], format!("event-{i}"));
    }
}

#[tokio::test]
async fn test_shutdown_closes_subscriber_sockets() {
    let (addr, hub, shutdown) = start_server().await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    wait_for(|| hub.subscriber_count() == 1, "subscriber to register").await;

    let _ = shutdown.send(true);

    // The relay side hangs up; the client sees the stream end.
    let outcome = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            }
        }
    })
    .await;
    assert!(outcome.is_ok(), "socket was not closed on shutdown");
    wait_for(|| hub.subscriber_count() == 0, "hub to empty").await;
}
