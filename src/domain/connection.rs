use parking_lot::RwLock;
use std::sync::Arc;

/// Upstream connection phase. The receive loop is the sole writer; everyone
/// else only reads snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Reconnecting => "reconnecting",
        }
    }
}

/// Connection phase plus the last recorded error.
///
/// The error is a flag orthogonal to the phase: a malformed inbound frame
/// records an error while the connection stays connected. A successful
/// (re)connect clears it.
#[derive(Debug, Clone, Default)]
pub struct ConnectionHealth {
    pub phase: ConnectionPhase,
    pub last_error: Option<String>,
}

impl ConnectionHealth {
    /// Public status vocabulary for health queries:
    /// disconnected / connecting / connected / reconnecting / error.
    pub fn status_label(&self) -> &'static str {
        if self.last_error.is_some() {
            "error"
        } else {
            self.phase.as_str()
        }
    }
}

/// Shared handle for observing and updating upstream connection health.
#[derive(Clone, Default)]
pub struct ConnectionMonitor {
    inner: Arc<RwLock<ConnectionHealth>>,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ConnectionHealth {
        self.inner.read().clone()
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.inner.read().phase
    }

    /// Advance the connection phase. Entering `Connected` clears any recorded
    /// error, since a fresh session supersedes it.
    pub fn set_phase(&self, phase: ConnectionPhase) {
        let mut health = self.inner.write();
        health.phase = phase;
        if phase == ConnectionPhase::Connected {
            health.last_error = None;
        }
    }

    /// Record an error without touching the phase.
    pub fn record_error(&self, error: impl Into<String>) {
        self.inner.write().last_error = Some(error.into());
    }
}
