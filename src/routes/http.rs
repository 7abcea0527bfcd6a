// GET handlers: version, latest snapshot, history

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/latest: newest snapshot, 204 until the first observation arrives.
pub(super) async fn latest_handler(State(state): State<AppState>) -> Response {
    match state.aggregator.latest() {
        Some(snapshot) => axum::Json(snapshot).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/history: retained snapshots, oldest first.
pub(super) async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.aggregator.history())
}
