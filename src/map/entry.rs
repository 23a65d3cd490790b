//! Map Entry Module
//!
//! A stored value plus the time it was last written.

use std::time::Duration;

use tokio::time::Instant;

// == Entry ==
/// A single stored value with its write timestamp.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    value: V,
    last_updated: Instant,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Wraps `value`, stamping it with the current time.
    pub(crate) fn new(value: V) -> Self {
        Self {
            value,
            last_updated: Instant::now(),
        }
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }

    // == Is Stale ==
    /// Checks whether the entry was written strictly before `now - expiry_delay`.
    ///
    /// An entry whose age equals the expiry delay exactly is still live.
    pub(crate) fn is_stale(&self, now: Instant, expiry_delay: Duration) -> bool {
        now.saturating_duration_since(self.last_updated) > expiry_delay
    }
}
