//! Counter store abstraction and the bundled in-process stores.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::counter::{self, CounterEntry};
use super::rate::Rate;
use super::window::WindowKey;
use crate::error::StoreError;

/// Storage for counter entries, one per window key.
///
/// `increment_and_get` must be a single atomic step per key: read the entry,
/// apply [`counter::hit`], write it back, with no other hit on the same key
/// interleaved. The rate supplies both the entry's lifetime and the ceiling
/// past which the count stops growing.
///
/// Expiring stale entries is left to the implementation. The limiter never
/// addresses a key again once its window has passed.
pub trait CounterStore: Send + Sync {
    /// Record one hit against `key` and return the resulting entry.
    fn increment_and_get(
        &self,
        key: &WindowKey,
        rate: &Rate,
        now: u64,
    ) -> Result<CounterEntry, StoreError>;
}

impl<S: CounterStore + ?Sized> CounterStore for Arc<S> {
    fn increment_and_get(
        &self,
        key: &WindowKey,
        rate: &Rate,
        now: u64,
    ) -> Result<CounterEntry, StoreError> {
        (**self).increment_and_get(key, rate, now)
    }
}

impl<S: CounterStore + ?Sized> CounterStore for Box<S> {
    fn increment_and_get(
        &self,
        key: &WindowKey,
        rate: &Rate,
        now: u64,
    ) -> Result<CounterEntry, StoreError> {
        (**self).increment_and_get(key, rate, now)
    }
}

/// A process-wide store shared by all callers.
///
/// Each key's read-modify-write happens under the owning shard's write lock,
/// so concurrent hits on the same key are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<WindowKey, CounterEntry>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry stored under `key`, if any.
    pub fn get(&self, key: &WindowKey) -> Option<CounterEntry> {
        self.entries.get(key).map(|e| *e)
    }

    /// Remove every entry whose window has passed. Returns how many went.
    pub fn purge_expired(&self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "Purged expired counter entries");
        }
        purged
    }

    /// Get the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl CounterStore for MemoryStore {
    fn increment_and_get(
        &self,
        key: &WindowKey,
        rate: &Rate,
        now: u64,
    ) -> Result<CounterEntry, StoreError> {
        let updated = match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let updated = counter::hit(Some(*occupied.get()), rate, now);
                *occupied.get_mut() = updated;
                updated
            }
            Entry::Vacant(vacant) => {
                trace!(key = %key, "Creating counter entry");
                *vacant.insert(counter::hit(None, rate, now))
            }
        };
        Ok(updated)
    }
}

/// A store owned by one caller context, such as a login session.
///
/// The host creates one per context and drops it with the context. Hits from
/// threads sharing the same session are serialized by the inner lock.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: Mutex<HashMap<WindowKey, CounterEntry>>,
}

impl SessionStore {
    /// Create an empty store for one caller context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry stored under `key`, if any.
    pub fn get(&self, key: &WindowKey) -> Option<CounterEntry> {
        self.entries.lock().get(key).copied()
    }

    /// Remove every entry whose window has passed. Returns how many went.
    pub fn purge_expired(&self, now: u64) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired session counter entries");
        }
        purged
    }

    /// Get the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl CounterStore for SessionStore {
    fn increment_and_get(
        &self,
        key: &WindowKey,
        rate: &Rate,
        now: u64,
    ) -> Result<CounterEntry, StoreError> {
        let mut entries = self.entries.lock();
        let updated = counter::hit(entries.get(key).copied(), rate, now);
        entries.insert(key.clone(), updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(identifier: &str, interval: u64, now: u64) -> WindowKey {
        WindowKey::derive(identifier, interval, now)
    }

    #[test]
    fn test_memory_store_creates_and_increments() {
        let store = MemoryStore::new();
        let rate = Rate::of(3, 10).unwrap();
        let k = key("u1", 10, 100);

        assert!(store.is_empty());
        let first = store.increment_and_get(&k, &rate, 100).unwrap();
        assert_eq!(first, CounterEntry { count: 1, reset_at: 110 });

        let second = store.increment_and_get(&k, &rate, 103).unwrap();
        assert_eq!(second, CounterEntry { count: 2, reset_at: 110 });
        assert_eq!(store.get(&k), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_freezes_past_limit() {
        let store = MemoryStore::new();
        let rate = Rate::of(2, 10).unwrap();
        let k = key("u1", 10, 100);

        for _ in 0..10 {
            store.increment_and_get(&k, &rate, 100).unwrap();
        }
        assert_eq!(store.get(&k).unwrap().count, 3);
    }

    #[test]
    fn test_memory_store_purge_expired() {
        let store = MemoryStore::new();
        let rate = Rate::of(5, 10).unwrap();

        store.increment_and_get(&key("old", 10, 100), &rate, 100).unwrap();
        store.increment_and_get(&key("new", 10, 115), &rate, 115).unwrap();

        assert_eq!(store.purge_expired(112), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&key("new", 10, 115)).is_some());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_concurrent_hits_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let rate = Rate::of(10_000, 60).unwrap();
        let k = key("shared", 60, 600);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let k = k.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        store.increment_and_get(&k, &rate, 600).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get(&k).unwrap().count, 2_000);
    }

    #[test]
    fn test_memory_store_concurrent_hits_admit_exactly_limit() {
        let store = Arc::new(MemoryStore::new());
        let rate = Rate::of(50, 60).unwrap();
        let k = key("burst", 60, 600);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let k = k.clone();
                thread::spawn(move || {
                    (0..25)
                        .filter(|_| {
                            store.increment_and_get(&k, &rate, 600).unwrap().count <= 50
                        })
                        .count()
                })
            })
            .collect();
        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(admitted, 50);
        assert_eq!(store.get(&k).unwrap().count, 51);
    }

    #[test]
    fn test_session_store_matches_memory_store() {
        let session = SessionStore::new();
        let memory = MemoryStore::new();
        let rate = Rate::of(2, 5).unwrap();
        let k = key("s", 5, 50);

        for now in 50..55 {
            let a = session.increment_and_get(&k, &rate, now).unwrap();
            let b = memory.increment_and_get(&k, &rate, now).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(session.len(), 1);
        assert_eq!(session.purge_expired(55), 1);
        assert!(session.is_empty());
    }

    #[test]
    fn test_store_through_trait_object() {
        let store: Arc<dyn CounterStore> = Arc::new(SessionStore::new());
        let rate = Rate::per_second(1).unwrap();
        let k = key("dyn", 1, 7);

        assert_eq!(store.increment_and_get(&k, &rate, 7).unwrap().count, 1);
        assert_eq!(store.increment_and_get(&k, &rate, 7).unwrap().count, 2);
    }

    #[test]
    fn test_store_through_boxed_trait_object() {
        let store: Box<dyn CounterStore> = Box::new(MemoryStore::new());
        let rate = Rate::of(1, 10).unwrap();
        let k = key("boxed", 10, 70);

        assert_eq!(store.increment_and_get(&k, &rate, 70).unwrap().count, 1);
        assert_eq!(store.increment_and_get(&k, &rate, 71).unwrap().count, 2);
        // Frozen past the limit.
        assert_eq!(store.increment_and_get(&k, &rate, 72).unwrap().count, 2);

        let boxed: Box<MemoryStore> = Box::new(MemoryStore::new());
        let first = boxed.increment_and_get(&k, &rate, 70).unwrap();
        assert_eq!(first, CounterEntry { count: 1, reset_at: 80 });
        assert_eq!(boxed.len(), 1);
    }
}
