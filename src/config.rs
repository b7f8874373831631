//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Default prefix under which cached values are served
pub const DEFAULT_BASE_PATH: &str = "/_cache";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget for each registered group's cache (0 = unlimited)
    pub cache_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
    /// URL prefix for cache lookups
    pub base_path: String,
    /// Interval in seconds between stats log lines (0 = disabled)
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Byte budget per group (default: 2048)
    /// - `SERVER_PORT` - HTTP server port (default: 9999)
    /// - `BASE_PATH` - URL prefix for cache lookups (default: /_cache)
    /// - `STATS_INTERVAL` - Stats reporting frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            base_path: env::var("BASE_PATH")
                .ok()
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
            stats_interval: env::var("STATS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stats_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_bytes: 2 << 10,
            server_port: 9999,
            base_path: DEFAULT_BASE_PATH.to_string(),
            stats_interval: 60,
        }
    }
}

/// Ensures a single leading slash and no trailing slash.
///
/// An empty or root-only path falls back to [`DEFAULT_BASE_PATH`].
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_PATH.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
