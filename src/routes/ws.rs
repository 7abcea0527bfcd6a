// WebSocket handler: pushes every newly published snapshot

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::models::Snapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements the snapshot-stream connection count on drop (connect = +1, drop = -1).
struct WsConnectionGuard(Arc<AtomicUsize>);

impl Drop for WsConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_snapshots(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let tx = state.snapshot_tx.clone();
    let conn_count = state.ws_snapshot_connections.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = tx.subscribe();
        if let Err(e) = stream_snapshots(socket, &mut rx, conn_count).await {
            tracing::info!("Snapshot stream error: {}", e);
        }
    })
}

/// Sends `text`; `false` when the client is gone or too slow.
async fn send_text(socket: &mut WebSocket, text: String) -> bool {
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(text.into()))).await;
    matches!(r, Ok(Ok(())))
}

async fn stream_snapshots(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<Arc<Snapshot>>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsConnectionGuard(conn_count);
    tracing::info!("Client connected to snapshot stream");

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        let json = serde_json::to_string(snapshot.as_ref())?;
                        if !send_text(&mut socket, json).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket /ws/snapshots client lagged, skipped {} messages", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}
