use axum::{Json, extract::State};
use std::sync::Arc;

use crate::application::{RelayStatus, StatusSnapshot};

/// GET /health
///
/// Always replies 200 with `status: "ok"`; a non-connected upstream is
/// conveyed by `connectionStatus` alone.
pub async fn health(State(status): State<Arc<RelayStatus>>) -> Json<StatusSnapshot> {
    Json(status.snapshot())
}
