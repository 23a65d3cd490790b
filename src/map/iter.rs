//! Iteration Module
//!
//! Lazy traversal of an [`ExpiryMap`](crate::ExpiryMap) under its lock.

use std::collections::hash_map;
use std::iter::FusedIterator;

use parking_lot::MutexGuard;

use crate::map::entry::Entry;
use crate::map::store::MapState;

// == Entries Guard ==
/// Exclusive view over every entry of an expiry map.
///
/// Returned by [`ExpiryMap::iter`](crate::ExpiryMap::iter). The map's lock is
/// held until this guard is dropped, so all other map operations and the
/// background sweep wait for it. Keep it short-lived and never hold it across
/// an `.await`.
///
/// ```ignore
/// for (key, value) in &map.iter() {
///     if key == &target {
///         break; // lock released when the guard drops
///     }
/// }
/// ```
pub struct Entries<'a, K, V> {
    guard: MutexGuard<'a, MapState<K, V>>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(guard: MutexGuard<'a, MapState<K, V>>) -> Self {
        Self { guard }
    }

    /// Starts a pass over the entries, in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.guard.entries.iter(),
        }
    }

    /// Returns the number of entries under the guard.
    pub fn len(&self) -> usize {
        self.guard.entries.len()
    }

    /// Returns true if the map was empty when locked.
    pub fn is_empty(&self) -> bool {
        self.guard.entries.is_empty()
    }
}

impl<'g, 'a, K, V> IntoIterator for &'g Entries<'a, K, V> {
    type Item = (&'g K, &'g V);
    type IntoIter = Iter<'g, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Iter ==
/// Iterator over `(key, value)` pairs borrowed from an [`Entries`] guard.
pub struct Iter<'g, K, V> {
    inner: hash_map::Iter<'g, K, Entry<V>>,
}

impl<'g, K, V> Iterator for Iter<'g, K, V> {
    type Item = (&'g K, &'g V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, entry)| (key, entry.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
