//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::{normalize_base_path, DEFAULT_BASE_PATH};
use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registered cache groups
    pub registry: Arc<GroupRegistry>,
    /// URL prefix for cache lookups
    pub base_path: String,
}

impl AppState {
    /// Creates a new AppState serving cache lookups under the default prefix.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            registry,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Serves cache lookups under `base_path` instead.
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = normalize_base_path(base_path);
        self
    }
}

/// Handler for GET {base_path}/:group/:key
///
/// Returns the raw value bytes, loading them through the group's getter on a
/// cache miss.
pub async fn cache_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Response> {
    let group = state
        .registry
        .get(&group_name)
        .ok_or(CacheError::GroupNotFound(group_name))?;

    // Getters may block on a backing store
    let value = tokio::task::spawn_blocking(move || group.get(&key))
        .await
        .map_err(|err| CacheError::Internal(err.to_string()))??;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_vec(),
    )
        .into_response())
}

/// Handler for GET /stats
///
/// Returns statistics for every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<Vec<StatsResponse>> {
    let stats = state
        .registry
        .groups()
        .iter()
        .map(|group| StatsResponse::from(group.stats()))
        .collect();

    Json(stats)
}

/// Handler for GET /stats/:group
///
/// Returns statistics for a single group.
pub async fn group_stats_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get(&group_name)
        .ok_or(CacheError::GroupNotFound(group_name))?;

    Ok(Json(StatsResponse::from(group.stats())))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
