use anyhow::Result;
use stationwatch::*;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!("Starting {}", version::banner());

    let aggregator = Arc::new(aggregator::Aggregator::new());
    let (snapshot_tx, _) =
        broadcast::channel::<Arc<models::Snapshot>>(app_config.publishing.broadcast_capacity);
    let stats = Arc::new(listener::IngestStats::default());
    let ws_snapshot_connections = Arc::new(AtomicUsize::new(0));

    let (listener_shutdown_tx, listener_shutdown_rx) = tokio::sync::oneshot::channel();
    let listener_handle = listener::spawn(
        listener::ListenerDeps {
            aggregator: aggregator.clone(),
            tx: snapshot_tx.clone(),
            stats: stats.clone(),
            shutdown_rx: listener_shutdown_rx,
        },
        app_config.listener.clone(),
    );

    let (reporter_shutdown_tx, reporter_shutdown_rx) = tokio::sync::oneshot::channel();
    let reporter_handle = reporter::spawn(
        reporter::ReporterDeps {
            aggregator: aggregator.clone(),
            stats,
            ws_snapshot_connections: ws_snapshot_connections.clone(),
            shutdown_rx: reporter_shutdown_rx,
        },
        app_config.reporting.clone(),
    );

    let app = routes::app(aggregator, snapshot_tx, ws_snapshot_connections);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let server = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(server, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
        }
    }

    let _ = listener_shutdown_tx.send(());
    let _ = reporter_shutdown_tx.send(());
    let _ = listener_handle.await;
    let _ = reporter_handle.await;

    Ok(())
}
