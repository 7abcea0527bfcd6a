// UDP listener for hub broadcasts. Each datagram goes through the aggregator;
// accepted snapshots are fanned out to streaming clients.
// The socket is bound with address/port reuse so several consumers on one
// host can share the hub's broadcast port. Bind/receive failures drop the
// socket and rebind after a delay.

use crate::aggregator::Aggregator;
use crate::config::ListenerConfig;
use crate::models::Snapshot;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing::Instrument;

/// Packet counters, reported by the reporter.
#[derive(Debug, Default)]
pub struct IngestStats {
    pub accepted: AtomicU64,
    /// Malformed packets only; other packet types are expected traffic.
    pub rejected: AtomicU64,
    pub ignored: AtomicU64,
}

/// Aggregator, fan-out channel, counters and shutdown for the listener.
pub struct ListenerDeps {
    pub aggregator: Arc<Aggregator>,
    pub tx: broadcast::Sender<Arc<Snapshot>>,
    pub stats: Arc<IngestStats>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Feeds one datagram to the aggregator. Rejections are logged and counted, never fatal.
pub fn handle_datagram(
    payload: &[u8],
    peer: Option<SocketAddr>,
    aggregator: &Aggregator,
    tx: &broadcast::Sender<Arc<Snapshot>>,
    stats: &IngestStats,
) -> Option<Arc<Snapshot>> {
    match aggregator.on_observation(payload) {
        Ok(snapshot) => {
            stats.accepted.fetch_add(1, Ordering::Relaxed);
            if tx.send(snapshot.clone()).is_err() {
                tracing::trace!(
                    operation = "broadcast_snapshot",
                    "No active WebSocket clients; broadcast channel has no receivers"
                );
            }
            Some(snapshot)
        }
        Err(e) if e.is_other_packet_type() => {
            stats.ignored.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(error = %e, "ignoring non-observation packet");
            None
        }
        Err(e) => {
            stats.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                error = %e,
                peer = ?peer,
                operation = "decode",
                "discarding malformed packet"
            );
            None
        }
    }
}

/// Binds a non-blocking UDP socket that other reuse-enabled sockets may share.
/// Must be called inside a tokio runtime.
pub fn bind_shared(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos"))))]
    socket.set_reuse_port(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    UdpSocket::from_std(socket.into())
}

async fn resolve_and_bind(addr: &str) -> io::Result<UdpSocket> {
    let resolved = tokio::net::lookup_host(addr).await?.next().ok_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, format!("{addr} did not resolve"))
    })?;
    bind_shared(resolved)
}

pub fn spawn(deps: ListenerDeps, config: ListenerConfig) -> tokio::task::JoinHandle<()> {
    let ListenerDeps {
        aggregator,
        tx,
        stats,
        mut shutdown_rx,
    } = deps;
    let addr = format!("{}:{}", config.host, config.port);
    let retry_delay = Duration::from_secs(config.retry_delay_secs);

    let listener_span = tracing::span!(tracing::Level::DEBUG, "listener", addr = %addr);

    tokio::spawn(
        async move {
            let mut buf = vec![0u8; config.buffer_size];

            'outer: loop {
                let bound = tokio::select! {
                    result = resolve_and_bind(&addr) => result,
                    _ = &mut shutdown_rx => break 'outer,
                };
                match bound {
                    Ok(socket) => {
                        tracing::info!("Listening for hub broadcasts on udp://{}", addr);
                        loop {
                            tokio::select! {
                                result = socket.recv_from(&mut buf) => {
                                    match result {
                                        Ok((n, peer)) => {
                                            handle_datagram(&buf[..n], Some(peer), &aggregator, &tx, &stats);
                                        }
                                        Err(e) => {
                                            tracing::warn!(
                                                error = %e,
                                                operation = "recv_from",
                                                "receive failed; rebinding"
                                            );
                                            break;
                                        }
                                    }
                                }
                                _ = &mut shutdown_rx => break 'outer,
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            operation = "bind",
                            retry_in_secs = retry_delay.as_secs(),
                            "bind failed"
                        );
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(retry_delay) => {}
                    _ = &mut shutdown_rx => break 'outer,
                }
            }
            tracing::debug!("Listener shutting down");
        }
        .instrument(listener_span),
    )
}
