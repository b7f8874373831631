//! LRU Cache Module
//!
//! Byte-bounded least recently used cache.
//!
//! Entries live in an arena addressed by stable slot handles. Recency is an
//! intrusive doubly-linked list over those handles where:
//! - Head = Least recently used (next eviction candidate)
//! - Tail = Most recently used

use std::collections::HashMap;
use std::fmt;

use crate::cache::ByteSize;

/// Observer called with each entry removed to satisfy the byte budget.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == Node ==
struct Node<V> {
    key: String,
    value: V,
    /// Bytes charged against the budget when the value was stored
    charge: usize,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Least recently used cache whose capacity is measured in bytes.
///
/// Every entry is charged `key.len() + value.byte_size()`. A `max_bytes` of
/// zero disables the ceiling entirely. Not thread-safe; see
/// [`ConcurrentCache`](crate::cache::ConcurrentCache) for a locked wrapper.
pub struct LruCache<V> {
    /// Capacity ceiling in bytes, 0 = unlimited
    max_bytes: usize,
    /// Exact sum of charges over live entries
    used_bytes: usize,
    /// Entry arena, `None` marks a free slot
    nodes: Vec<Option<Node<V>>>,
    /// Free slots available for reuse
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Key to arena slot
    index: HashMap<String, usize>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ByteSize> LruCache<V> {
    // == Constructors ==
    /// Creates an empty cache without an eviction callback.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports every evicted entry to `on_evicted`.
    ///
    /// The callback runs after the entry has been detached and its bytes
    /// released, so it observes a consistent cache.
    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    // == Get ==
    /// Looks up a key and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_back(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Contains ==
    /// Checks for a key without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts from the head until the
    /// budget holds again.
    ///
    /// An entry larger than the whole budget is accepted and immediately
    /// evicted along with everything older than it, leaving the cache empty.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        self.insert(key.into(), value);
        while self.over_budget() {
            if !self.remove_oldest() {
                break;
            }
        }
    }

    /// Same as [`add`](Self::add) but hands evicted entries back instead of
    /// invoking the callback, oldest first.
    ///
    /// Lets a locking wrapper release its lock before notifying observers.
    pub fn add_deferring_evictions(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Vec<(String, V)> {
        self.insert(key.into(), value);
        let mut evicted = Vec::new();
        while self.over_budget() {
            match self.pop_oldest() {
                Some(entry) => evicted.push(entry),
                None => break,
            }
        }
        evicted
    }

    // == Accessors ==
    /// Returns the number of entries (not bytes).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the bytes currently charged against the budget.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Returns the next eviction candidate without removing it.
    pub fn oldest_key(&self) -> Option<&str> {
        self.head
            .and_then(|idx| self.nodes[idx].as_ref())
            .map(|node| node.key.as_str())
    }

    /// Iterates keys from least to most recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    // == Internals ==
    fn over_budget(&self) -> bool {
        self.max_bytes != 0 && self.used_bytes > self.max_bytes
    }

    fn insert(&mut self, key: String, value: V) {
        let charge = key.len() + value.byte_size();

        if let Some(&idx) = self.index.get(&key) {
            if let Some(node) = self.nodes[idx].as_mut() {
                self.used_bytes = self.used_bytes - node.charge + charge;
                node.charge = charge;
                node.value = value;
            }
            self.move_to_back(idx);
            return;
        }

        let idx = self.alloc(Node {
            key: key.clone(),
            value,
            charge,
            prev: None,
            next: None,
        });
        self.link_back(idx);
        self.index.insert(key, idx);
        self.used_bytes += charge;
    }

    /// Detaches the head entry and releases its bytes.
    fn pop_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.head?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.charge;
        Some((node.key, node.value))
    }

    /// Evicts the head entry and notifies the callback. Returns false when empty.
    fn remove_oldest(&mut self) -> bool {
        match self.pop_oldest() {
            Some((key, value)) => {
                if let Some(on_evicted) = self.on_evicted.as_mut() {
                    on_evicted(key, value);
                }
                true
            }
            None => false,
        }
    }

    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail_idx) => {
                if let Some(tail) = self.nodes[tail_idx].as_mut() {
                    tail.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = self.nodes[prev_idx].as_mut() {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = self.nodes[next_idx].as_mut() {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    /// Walks the whole structure and panics on any broken invariant.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut seen = 0;
        let mut charged = 0;
        let mut measured = 0;
        let mut prev = None;
        let mut cursor = self.head;

        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref().expect("linked slot is free");
            assert_eq!(node.prev, prev, "broken back link at {:?}", node.key);
            assert_eq!(self.index.get(&node.key), Some(&idx), "index mismatch for {:?}", node.key);
            charged += node.charge;
            measured += node.key.len() + node.value.byte_size();
            seen += 1;
            prev = Some(idx);
            cursor = node.next;
        }

        assert_eq!(self.tail, prev, "tail does not end the list");
        assert_eq!(seen, self.index.len(), "list and index disagree on size");
        assert_eq!(charged, self.used_bytes, "stale byte accounting");
        assert_eq!(measured, self.used_bytes, "charges drifted from value sizes");
        assert_eq!(self.nodes.len() - self.free.len(), seen, "leaked arena slots");
        assert!(
            self.max_bytes == 0 || self.used_bytes <= self.max_bytes,
            "used {} exceeds max {}",
            self.used_bytes,
            self.max_bytes
        );
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("has_eviction_callback", &self.on_evicted.is_some())
            .finish()
    }
}

// == Keys Iterator ==
/// Keys in recency order, oldest first. Created by [`LruCache::keys`].
pub struct Keys<'a, V> {
    nodes: &'a [Option<Node<V>>],
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
