// Fixed-capacity rolling window. Oldest element is evicted first once full.
//
// Trend lookbacks index this positionally: the hub reports once a minute, so
// the n-th newest element stands in for "n minutes ago".

use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::Snapshot;

/// ~12 hours at one observation per minute.
pub const WINDOW_CAPACITY: usize = 720;

/// The published history: shared snapshots, oldest first.
pub type SnapshotWindow = Window<Arc<Snapshot>>;

#[derive(Debug, Clone)]
pub struct Window<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> Default for Window<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Window<T> {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be > 0");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends, evicting the oldest element first when full.
    pub fn append(&mut self, item: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(item);
    }

    /// Point-in-time copy, oldest first.
    pub fn snapshot_all(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }

    /// Last `n` elements in arrival order (fewer if the window holds less).
    pub fn tail(&self, n: usize) -> Vec<T> {
        self.iter_tail(n).cloned().collect()
    }

    pub fn iter_tail(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn newest(&self) -> Option<&T> {
        self.entries.back()
    }
}
