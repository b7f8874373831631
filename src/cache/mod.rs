//! Cache Module
//!
//! Provides byte-bounded in-memory caching with LRU eviction.

mod lru;
mod stats;
mod store;
mod value;


// Re-export public types
pub use lru::{EvictionCallback, Keys, LruCache};
pub use stats::CacheStats;
pub use store::{ConcurrentCache, EvictionObserver};
pub use value::{ByteSize, ByteView};
