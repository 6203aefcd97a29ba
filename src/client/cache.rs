//! In-memory TTL cache for fetched schedules.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default time-to-live for cached schedules.
pub const DEFAULT_SCHEDULE_TTL: Duration = Duration::from_secs(60 * 60);

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

/// Key/value store with per-entry time-to-live.
///
/// Expiry is checked on read: a `get` that finds an entry older than its
/// TTL evicts it and reports a miss. Nothing expires in the background.
pub struct CacheStore<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V: Clone> CacheStore<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value under `key`, replacing any previous entry.
    pub fn put(&self, key: K, value: V, ttl: Duration) {
        self.entries.lock().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Fetch a live value; expired entries are evicted and count as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= entry.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<K: Eq + Hash, V: Clone> Default for CacheStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
