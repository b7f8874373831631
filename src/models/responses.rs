//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::group::GroupStats;

/// Response body for the stats endpoints (GET /stats, GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group name
    pub group: String,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Bytes charged against the budget
    pub used_bytes: usize,
    /// Byte budget (0 = unlimited)
    pub max_bytes: usize,
    /// Number of getter invocations after a miss
    pub loads: u64,
    /// Number of getter invocations that failed
    pub load_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// used_bytes / max_bytes, 0 when unlimited
    pub fill_ratio: f64,
}

impl From<GroupStats> for StatsResponse {
    fn from(stats: GroupStats) -> Self {
        Self {
            hit_rate: stats.cache.hit_rate(),
            fill_ratio: stats.cache.fill_ratio(),
            group: stats.name,
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            evictions: stats.cache.evictions,
            total_entries: stats.cache.total_entries,
            used_bytes: stats.cache.used_bytes,
            max_bytes: stats.cache.max_bytes,
            loads: stats.loads,
            load_failures: stats.load_failures,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
