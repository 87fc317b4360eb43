use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use tracing::trace;

/// Cached value with its recency stamp
struct CachedEntry<V> {
    value: V,
    last_used: u64,
}

struct CacheState<K, V> {
    entries: HashMap<K, CachedEntry<V>>,
    // Monotonic logical clock; bumped on every touch
    clock: u64,
}

impl<K, V> CacheState<K, V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Point-in-time counters of a [`ResultCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Thread-safe, capacity-bounded LRU cache
///
/// Capacity is the only hard contract: the cache never holds more than
/// `capacity` entries. A capacity of zero stores nothing.
pub struct ResultCache<K, V> {
    capacity: usize,
    state: Mutex<CacheState<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> Debug for ResultCache<K, V> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("capacity", &self.capacity)
            .field("len", &self.state.lock().entries.len())
            .finish()
    }
}

impl<K, V> ResultCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity),
                clock: 0,
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Looks up `key`, marking the entry as most recently used on a hit.
    pub fn get(
        &self,
        key: &K,
    ) -> Option<V> {
        let mut state = self.state.lock();
        let now = state.tick();
        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Presence check that leaves recency and hit counters untouched.
    pub fn contains(
        &self,
        key: &K,
    ) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    /// Inserts or replaces `key`.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry, which is returned.
    pub fn put(
        &self,
        key: K,
        value: V,
    ) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }

        let mut state = self.state.lock();
        let now = state.tick();

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.value = value;
            entry.last_used = now;
            return None;
        }

        let evicted = if state.entries.len() >= self.capacity {
            Self::evict_least_recent(&mut state)
        } else {
            None
        };
        if evicted.is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }

        state.entries.insert(
            key,
            CachedEntry {
                value,
                last_used: now,
            },
        );
        trace!(len = state.entries.len(), capacity = self.capacity, "Result cached");

        evicted
    }

    fn evict_least_recent(state: &mut CacheState<K, V>) -> Option<(K, V)> {
        let oldest = state
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())?;

        state.entries.remove_entry(&oldest).map(|(key, entry)| (key, entry.value))
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }
}
