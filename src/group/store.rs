//! Group Store Module
//!
//! A named, byte-bounded cache that fills itself from a getter on a miss.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, ConcurrentCache};
use crate::error::{CacheError, Result};
use crate::group::Getter;

// == Group ==
/// A cache namespace with its own byte budget and loader.
pub struct Group {
    name: String,
    getter: Box<dyn Getter>,
    main_cache: ConcurrentCache<ByteView>,
    /// Getter invocations
    loads: AtomicU64,
    /// Getter invocations that returned an error
    load_failures: AtomicU64,
}

/// Point-in-time statistics for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub name: String,
    pub cache: CacheStats,
    pub loads: u64,
    pub load_failures: u64,
}

impl Group {
    // == Constructor ==
    /// Creates a group whose cache holds at most `max_bytes` (0 = unlimited).
    pub fn new(name: impl Into<String>, max_bytes: usize, getter: impl Getter + 'static) -> Self {
        let name = name.into();
        let group_name = name.clone();
        let main_cache =
            ConcurrentCache::with_eviction_observer(max_bytes, move |key, value: ByteView| {
                debug!(group = %group_name, key = %key, bytes = value.len(), "evicted");
            });

        Self {
            name,
            getter: Box::new(getter),
            main_cache,
            loads: AtomicU64::new(0),
            load_failures: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Returns the cached value, loading it through the getter on a miss.
    ///
    /// A successful load is added to the cache before returning.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        self.loads.fetch_add(1, Ordering::Relaxed);

        let bytes = self.getter.get(key).map_err(|err| {
            self.load_failures.fetch_add(1, Ordering::Relaxed);
            warn!(group = %self.name, key, error = %err, "load failed");
            CacheError::Load(format!("{:#}", err))
        })?;

        let value = ByteView::from(bytes);
        debug!(group = %self.name, key, bytes = value.len(), "loaded");
        self.main_cache.add(key, value.clone());
        Ok(value)
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStats {
        GroupStats {
            name: self.name.clone(),
            cache: self.main_cache.stats(),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}
