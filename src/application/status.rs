use serde::Serialize;
use std::time::Instant;

use crate::domain::{ConnectionMonitor, TrackedSymbols};
use crate::infrastructure::BroadcastHub;

/// Snapshot of the relay's externally visible state, serialized for the
/// health endpoint. Field names are part of the wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub status: &'static str,
    pub connection_status: &'static str,
    pub tracked_coins: Vec<String>,
    pub connected_clients: usize,
    pub uptime: u64,
}

/// Read model aggregating connection health, the tracked-symbol set, and the
/// subscriber count. Holds no state of its own beyond the start instant;
/// every query composes a fresh snapshot from the live components.
#[derive(Clone)]
pub struct RelayStatus {
    monitor: ConnectionMonitor,
    symbols: TrackedSymbols,
    hub: BroadcastHub,
    started_at: Instant,
}

impl RelayStatus {
    pub fn new(monitor: ConnectionMonitor, symbols: TrackedSymbols, hub: BroadcastHub) -> Self {
        RelayStatus {
            monitor,
            symbols,
            hub,
            started_at: Instant::now(),
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: "ok",
            connection_status: self.monitor.snapshot().status_label(),
            tracked_coins: self.symbols.as_slice().to_vec(),
            connected_clients: self.hub.subscriber_count(),
            uptime: self.started_at.elapsed().as_secs(),
        }
    }
}
