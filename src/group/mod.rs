//! Group Module
//!
//! Named caches that load missing values through a caller-supplied getter,
//! and the registry that owns them.

mod getter;
mod registry;
mod store;

pub use getter::{getter_fn, Getter};
pub use registry::GroupRegistry;
pub use store::{Group, GroupStats};
