// Owns the published (current snapshot, window) pair.
//
// Ingestion derives the next snapshot from a pinned copy of the state, then
// swaps in a new state holding both the new current and the appended window.
// Readers clone the state pointer under a short read lock, so they see either
// the whole update or none of it and never iterate while holding the lock.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, instrument};

use crate::decoder::{self, DecodeError};
use crate::metrics;
use crate::models::{Observation, Snapshot};
use crate::window::SnapshotWindow;

#[derive(Debug, Clone, Default)]
struct Published {
    current: Option<Arc<Snapshot>>,
    window: SnapshotWindow,
}

#[derive(Debug, Default)]
pub struct Aggregator {
    published: RwLock<Arc<Published>>,
    /// Serializes ingestion so updates apply in arrival order.
    ingest: Mutex<()>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one raw packet and, if it is an observation, publishes the
    /// derived snapshot. Rejected packets leave the state untouched.
    pub fn on_observation(&self, raw: &[u8]) -> Result<Arc<Snapshot>, DecodeError> {
        let obs = decoder::decode(raw)?;
        Ok(self.ingest(&obs))
    }

    #[instrument(skip_all, fields(epoch = obs.epoch))]
    pub fn ingest(&self, obs: &Observation) -> Arc<Snapshot> {
        let _turn = self.ingest.lock().unwrap_or_else(PoisonError::into_inner);

        let prior = self.state();
        let snapshot = Arc::new(metrics::derive(obs, &prior.window));

        let mut next = Published::clone(&prior);
        next.window.append(snapshot.clone());
        next.current = Some(snapshot.clone());
        let retained = next.window.len();

        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(next);

        debug!(
            operation = "ingest",
            retained,
            pressure_mb = snapshot.pressure_mb,
            "snapshot published"
        );
        snapshot
    }

    fn state(&self) -> Arc<Published> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent snapshot; `None` before the first observation.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.state().current.clone()
    }

    /// Retained snapshots, oldest first (at most 720).
    pub fn history(&self) -> Vec<Arc<Snapshot>> {
        self.state().window.snapshot_all()
    }

    /// Latest snapshot and history from the same instant.
    pub fn latest_with_history(&self) -> (Option<Arc<Snapshot>>, Vec<Arc<Snapshot>>) {
        let state = self.state();
        (state.current.clone(), state.window.snapshot_all())
    }

    pub fn len(&self) -> usize {
        self.state().window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
