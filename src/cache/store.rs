//! Concurrent Cache Module
//!
//! Thread-safe wrapper combining the byte-bounded LRU cache with statistics.
//!
//! Every operation runs inside a single critical section. Eviction observers
//! are queued while the lock is held and invoked after it is released, so an
//! observer may call back into the same cache.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{ByteSize, CacheStats, LruCache};

/// Observer notified of entries evicted from a [`ConcurrentCache`].
pub type EvictionObserver<V> = Arc<dyn Fn(String, V) + Send + Sync>;

struct Inner<V> {
    lru: LruCache<V>,
    stats: CacheStats,
}

// == Concurrent Cache ==
/// Byte-bounded LRU cache safe to share between threads.
pub struct ConcurrentCache<V> {
    inner: Mutex<Inner<V>>,
    on_evicted: Option<EvictionObserver<V>>,
}

impl<V: ByteSize + Clone> ConcurrentCache<V> {
    // == Constructors ==
    /// Creates an empty cache with the given byte budget (0 = unlimited).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lru: LruCache::new(max_bytes),
                stats: CacheStats::new(),
            }),
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports evictions to `on_evicted`.
    pub fn with_eviction_observer<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: Fn(String, V) + Send + Sync + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Arc::new(on_evicted));
        cache
    }

    // == Get ==
    /// Retrieves a clone of the value and marks the key as most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock();
        let Inner { lru, stats } = &mut *guard;

        match lru.get(key) {
            Some(value) => {
                stats.record_hit();
                Some(value.clone())
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Add ==
    /// Stores a value, evicting least recently used entries as needed.
    pub fn add(&self, key: impl Into<String>, value: V) {
        let evicted = {
            let mut guard = self.inner.lock();
            let evicted = guard.lru.add_deferring_evictions(key, value);
            guard.stats.record_evictions(evicted.len() as u64);
            evicted
        };

        if let Some(on_evicted) = &self.on_evicted {
            for (key, value) in evicted {
                on_evicted(key, value);
            }
        }
    }

    // == Accessors ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().lru.is_empty()
    }

    /// Returns the bytes currently charged against the budget.
    pub fn used_bytes(&self) -> usize {
        self.inner.lock().lru.used_bytes()
    }

    pub fn max_bytes(&self) -> usize {
        self.inner.lock().lru.max_bytes()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = self.inner.lock();
        let mut stats = guard.stats.clone();
        stats.set_usage(guard.lru.len(), guard.lru.used_bytes(), guard.lru.max_bytes());
        stats
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.inner.lock().lru.assert_invariants();
    }
}

impl<V> fmt::Debug for ConcurrentCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("lru", &self.inner.lock().lru)
            .field("has_eviction_observer", &self.on_evicted.is_some())
            .finish()
    }
}
