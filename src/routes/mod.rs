// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::Aggregator;
use crate::models::Snapshot;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) snapshot_tx: broadcast::Sender<Arc<Snapshot>>,
    pub(crate) ws_snapshot_connections: Arc<AtomicUsize>,
}

pub fn app(
    aggregator: Arc<Aggregator>,
    snapshot_tx: broadcast::Sender<Arc<Snapshot>>,
    ws_snapshot_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        aggregator,
        snapshot_tx,
        ws_snapshot_connections,
    };
    Router::new()
        .route("/", get(|| async { crate::version::banner() })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/latest", get(http::latest_handler)) // GET /api/latest
        .route("/api/history", get(http::history_handler)) // GET /api/history
        .route("/ws/snapshots", get(ws::ws_snapshots)) // WS /ws/snapshots
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
