//! Expiry Map Store Module
//!
//! The map itself: a single mutex over a `HashMap` of timestamped entries,
//! shared with a background sweep task that drops stale entries.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::config::Config;
use crate::error::{ExpiryError, Result};
use crate::map::entry::Entry;
use crate::map::iter::Entries;
use crate::map::stats::MapStats;
use crate::tasks::{spawn_sweep_task, SweepHandle};

// == Map State ==
/// Everything guarded by the map's lock.
pub(crate) struct MapState<K, V> {
    pub(crate) entries: HashMap<K, Entry<V>>,
    stats: MapStats,
}

// == Shared ==
/// State shared between the map handle and its sweep task.
pub(crate) struct Shared<K, V> {
    state: Mutex<MapState<K, V>>,
    expiry_delay: Duration,
}

impl<K, V> Shared<K, V>
where
    K: Eq + Hash,
{
    // == Sweep ==
    /// Removes every entry written strictly before `now - expiry_delay`.
    ///
    /// `now` is read after the lock is taken, so a write that wins the race
    /// for the lock is never judged against an older clock reading.
    pub(crate) fn sweep(&self) -> usize {
        let mut state = self.state.lock();
        let now = Instant::now();
        let before = state.entries.len();

        state
            .entries
            .retain(|_, entry| !entry.is_stale(now, self.expiry_delay));

        let removed = before - state.entries.len();
        state.stats.record_sweep(removed);
        removed
    }
}

// == Expiry Map ==
/// A thread-safe map whose entries expire a fixed delay after their last write.
///
/// Expired entries are not removed on access; a background task sweeps the
/// map every sweep interval and drops whatever has gone stale. Until then an
/// expired entry is still visible to [`get`](Self::get), [`len`](Self::len)
/// and [`iter`](Self::iter).
///
/// Every operation takes the same exclusive lock, so operations are
/// sequentially consistent with each other and with the sweep.
///
/// # Example
/// ```ignore
/// let map = ExpiryMap::new(Duration::from_secs(30), Duration::from_secs(1))?;
/// map.set("session", token);
/// assert!(map.get("session").is_some());
/// map.stop().await;
/// ```
pub struct ExpiryMap<K, V> {
    shared: Arc<Shared<K, V>>,
    sweeper: SweepHandle,
    sweep_interval: Duration,
}

impl<K, V> ExpiryMap<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    // == Constructor ==
    /// Creates an empty map and starts its sweep task on the current Tokio runtime.
    ///
    /// # Arguments
    /// * `expiry_delay` - How long an entry lives after its last write. Zero
    ///   means entries go on the next sweep.
    /// * `sweep_interval` - Period between sweeps. Must be non-zero.
    ///
    /// # Errors
    /// - `ExpiryError::InvalidSweepInterval` if `sweep_interval` is zero
    /// - `ExpiryError::NoRuntime` if called outside a Tokio runtime
    pub fn new(expiry_delay: Duration, sweep_interval: Duration) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ExpiryError::NoRuntime)?;
        Self::with_runtime(&runtime, expiry_delay, sweep_interval)
    }

    /// Creates an empty map whose sweep task runs on `runtime`.
    ///
    /// Lets code that is not itself running inside Tokio own a map.
    pub fn with_runtime(
        runtime: &Handle,
        expiry_delay: Duration,
        sweep_interval: Duration,
    ) -> Result<Self> {
        if sweep_interval.is_zero() {
            return Err(ExpiryError::InvalidSweepInterval(sweep_interval));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(MapState {
                entries: HashMap::new(),
                stats: MapStats::new(),
            }),
            expiry_delay,
        });
        let sweeper = spawn_sweep_task(runtime, Arc::clone(&shared), sweep_interval);

        Ok(Self {
            shared,
            sweeper,
            sweep_interval,
        })
    }

    /// Creates a map from a [`Config`] on the current Tokio runtime.
    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.expiry_delay, config.sweep_interval)
    }
}

impl<K, V> ExpiryMap<K, V>
where
    K: Eq + Hash,
{
    // == Get ==
    /// Returns a clone of the value stored for `key`.
    ///
    /// Reading does not extend the entry's life.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut state = self.shared.state.lock();
        let value = state.entries.get(key).map(|entry| entry.value().clone());

        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    /// Returns true if `key` is present. Not counted in the stats.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.state.lock().entries.contains_key(key)
    }

    // == Set ==
    /// Stores `value` under `key` and restarts its expiry clock.
    ///
    /// Overwrites any previous value for the key.
    pub fn set(&self, key: K, value: V) {
        let mut state = self.shared.state.lock();
        state.entries.insert(key, Entry::new(value));
    }

    // == Delete ==
    /// Removes `key`, returning its value if it was present.
    ///
    /// Deleting an absent key is a no-op.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared
            .state
            .lock()
            .entries
            .remove(key)
            .map(Entry::into_value)
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.shared.state.lock().entries.len()
    }

    /// Returns true if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().entries.is_empty()
    }

    // == Iterate ==
    /// Locks the map and returns a guard that yields its entries lazily.
    ///
    /// Every other operation, the sweep included, blocks until the guard is
    /// dropped. Breaking out of a loop early releases the lock as soon as the
    /// guard goes out of scope. Do not call other methods of this map while
    /// holding the guard on the same thread; that deadlocks.
    pub fn iter(&self) -> Entries<'_, K, V> {
        Entries::new(self.shared.state.lock())
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.shared.state.lock().entries.clear();
    }

    // == Purge Expired ==
    /// Runs one sweep cycle now, on the calling thread.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.sweep()
    }

    // == Stats ==
    /// Returns a snapshot of the map's counters.
    pub fn stats(&self) -> MapStats {
        let state = self.shared.state.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        stats
    }
}

impl<K, V> ExpiryMap<K, V> {
    /// Returns how long entries live after their last write.
    pub fn expiry_delay(&self) -> Duration {
        self.shared.expiry_delay
    }

    /// Returns the period between background sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Returns true while the sweep task is alive and [`stop`](Self::stop)
    /// has not been called.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper.is_running()
    }

    // == Stop ==
    /// Stops the background sweep task and waits for it to exit.
    ///
    /// Safe to call more than once and from several tasks at once; every
    /// call returns only after the task has exited. The map stays fully
    /// usable afterwards, its entries just no longer expire.
    /// Must not be awaited while an [`Entries`] guard from this map is alive.
    pub async fn stop(&self) {
        self.sweeper.shutdown().await;
    }
}

impl<K, V> fmt::Debug for ExpiryMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryMap")
            .field("len", &self.shared.state.lock().entries.len())
            .field("expiry_delay", &self.shared.expiry_delay)
            .field("sweep_interval", &self.sweep_interval)
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
