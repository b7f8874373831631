//! Byte Cache - A byte-bounded LRU cache server
//!
//! Named cache groups with least recently used eviction against a byte
//! budget, filled on a miss by a caller-supplied getter.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use group::{getter_fn, Getter, Group, GroupRegistry};
pub use tasks::spawn_stats_task;
