// Periodic report: the latest snapshot as JSON plus ingest counters.

use crate::aggregator::Aggregator;
use crate::config::ReportingConfig;
use crate::listener::IngestStats;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, interval};

pub struct ReporterDeps {
    pub aggregator: Arc<Aggregator>,
    pub stats: Arc<IngestStats>,
    pub ws_snapshot_connections: Arc<AtomicUsize>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Latest snapshot rendered as a JSON line; `None` before the first observation.
pub fn report_line(aggregator: &Aggregator) -> anyhow::Result<Option<String>> {
    match aggregator.latest() {
        Some(snapshot) => Ok(Some(serde_json::to_string(snapshot.as_ref())?)),
        None => Ok(None),
    }
}

fn report_once(
    aggregator: &Aggregator,
    stats: &IngestStats,
    ws_snapshot_connections: &AtomicUsize,
) {
    match report_line(aggregator) {
        Ok(Some(line)) => tracing::info!(operation = "report", snapshot = %line, "latest"),
        Ok(None) => tracing::debug!(operation = "report", "no observation received yet"),
        Err(e) => tracing::warn!(error = %e, operation = "report", "report failed"),
    }
    tracing::info!(
        packets_accepted = stats.accepted.load(Ordering::Relaxed),
        packets_rejected = stats.rejected.load(Ordering::Relaxed),
        packets_ignored = stats.ignored.load(Ordering::Relaxed),
        snapshots_retained = aggregator.len(),
        ws_snapshot_clients = ws_snapshot_connections.load(Ordering::Relaxed),
        "app stats"
    );
}

pub fn spawn(deps: ReporterDeps, config: ReportingConfig) -> tokio::task::JoinHandle<()> {
    let ReporterDeps {
        aggregator,
        stats,
        ws_snapshot_connections,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        if !config.enabled {
            let _ = shutdown_rx.await;
            return;
        }
        let mut tick = interval(Duration::from_secs(config.interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick fires immediately; nothing to report yet.
        tick.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => report_once(&aggregator, &stats, &ws_snapshot_connections),
                _ = &mut shutdown_rx => {
                    tracing::debug!("Reporter shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_line_is_empty_before_first_observation() {
        let agg = Aggregator::new();
        assert_eq!(report_line(&agg).unwrap(), None);
    }

    #[test]
    fn report_line_carries_snapshot_json() {
        let agg = Aggregator::new();
        agg.on_observation(
            br#"{"type":"obs_st","obs":[[1588948614,0,0,0,0,3,1013.0,20.0,55,0,5,0,0,0,0,0,2.4,1]]}"#,
        )
        .unwrap();
        let line = report_line(&agg).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["temperature_f"], 68.0);
        assert_eq!(json["uv_exposure_category"], "MODERATE");
        assert_eq!(json["last_updated_iso_8601"], "2020-05-08T14:36:54+00:00");
    }
}
