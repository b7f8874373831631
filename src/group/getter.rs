//! Getter Module
//!
//! Source of truth consulted when a group misses in its cache.

/// Loads the value for a key that is not cached.
///
/// Implemented for any `Fn(&str) -> anyhow::Result<Vec<u8>>` closure. Use
/// [`getter_fn`] to pin the closure signature at the call site.
pub trait Getter: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

/// Wraps a closure as a [`Getter`].
pub fn getter_fn<F>(f: F) -> F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    f
}
