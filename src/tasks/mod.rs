//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Stats reporting: Logs per-group cache statistics at a configured interval

mod stats;

pub use stats::{report_stats, spawn_stats_task};
