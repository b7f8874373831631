//! Byte Cache - A byte-bounded LRU cache server
//!
//! Serves the demo `scores` group, backed by a slow in-memory database.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use byte_cache::api::create_router;
use byte_cache::{getter_fn, spawn_stats_task, AppState, Config, Getter, GroupRegistry};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the `scores` group
/// 4. Start background stats reporting task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "byte_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting byte cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_bytes={}, port={}, base_path={}, stats_interval={}s",
        config.cache_bytes, config.server_port, config.base_path, config.stats_interval
    );

    let registry = Arc::new(GroupRegistry::new());
    registry.register("scores", config.cache_bytes, slow_db_getter());

    let stats_handle = (config.stats_interval > 0)
        .then(|| spawn_stats_task(Arc::clone(&registry), config.stats_interval));

    let state = AppState::new(registry).with_base_path(&config.base_path);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        "Server listening on http://{}{}/:group/:key",
        addr, config.base_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stats_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Getter over a fixed score table that logs every lookup reaching it.
fn slow_db_getter() -> impl Getter {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    getter_fn(move |key| {
        info!("[SlowDB] search key {}", key);
        db.get(key)
            .map(|value| value.as_bytes().to_vec())
            .ok_or_else(|| anyhow!("{} not exist", key))
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the stats task and allows graceful shutdown.
async fn shutdown_signal(stats_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = stats_handle {
        handle.abort();
        warn!("Stats task aborted");
    }
}
