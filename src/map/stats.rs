//! Map Statistics Module
//!
//! Tracks lookup hits and misses plus sweep activity.

use serde::Serialize;

// == Map Stats ==
/// Counters describing how an expiry map has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapStats {
    /// Number of lookups that found a value
    pub hits: u64,
    /// Number of lookups that found nothing
    pub misses: u64,
    /// Number of entries removed by sweeps
    pub expired: u64,
    /// Number of completed sweep cycles
    pub sweeps: u64,
    /// Current number of entries in the map
    pub total_entries: usize,
}

impl MapStats {
    // == Constructor ==
    /// Creates a new MapStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Sweep ==
    /// Counts one sweep cycle and the entries it removed.
    pub(crate) fn record_sweep(&mut self, removed: usize) {
        self.sweeps += 1;
        self.expired += removed as u64;
    }
}
