//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use byte_cache::{api::create_router, getter_fn, AppState, GroupRegistry};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Registry with a `scores` group whose getter counts how often it runs.
fn scores_registry(max_bytes: usize) -> (Arc<GroupRegistry>, Arc<AtomicUsize>) {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);

    let registry = Arc::new(GroupRegistry::new());
    registry.register(
        "scores",
        max_bytes,
        getter_fn(move |key| {
            counter.fetch_add(1, Ordering::SeqCst);
            db.get(key)
                .map(|v| v.as_bytes().to_vec())
                .ok_or_else(|| anyhow!("{} not exist", key))
        }),
    );

    (registry, loads)
}

fn create_test_app(max_bytes: usize) -> (Router, Arc<AtomicUsize>) {
    let (registry, loads) = scores_registry(max_bytes);
    (create_router(AppState::new(registry)), loads)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_endpoint_loads_value() {
    let (app, loads) = create_test_app(2 << 10);

    let (status, body) = get(&app, "/_cache/scores/Tom").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"630");
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_endpoint_second_request_hits_cache() {
    let (app, loads) = create_test_app(2 << 10);

    for _ in 0..5 {
        let (status, body) = get(&app, "/_cache/scores/Jack").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"589");
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_endpoint_unknown_key() {
    let (app, _) = create_test_app(2 << 10);

    let (status, json) = get_json(&app, "/_cache/scores/Unknown").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("Unknown not exist"));
}

#[tokio::test]
async fn test_cache_endpoint_unknown_group() {
    let (app, loads) = create_test_app(2 << 10);

    let (status, json) = get_json(&app, "/_cache/nope/Tom").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nope"));
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_small_budget_forces_reload() {
    // Room for one score entry at a time
    let (app, loads) = create_test_app(8);

    get(&app, "/_cache/scores/Tom").await;
    get(&app, "/_cache/scores/Sam").await;
    let (status, body) = get(&app, "/_cache/scores/Tom").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"630");
    assert_eq!(loads.load(Ordering::SeqCst), 3);

    let (_, json) = get_json(&app, "/stats/scores").await;
    assert_eq!(json["evictions"], 2);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["used_bytes"], 6);
    assert_eq!(json["fill_ratio"], 0.75);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _) = create_test_app(2 << 10);

    get(&app, "/_cache/scores/Tom").await; // miss + load
    get(&app, "/_cache/scores/Tom").await; // hit
    get(&app, "/_cache/scores/Ghost").await; // miss + failed load

    let (status, json) = get_json(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);

    let groups = json.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    let scores = &groups[0];
    assert_eq!(scores["group"], "scores");
    assert_eq!(scores["hits"], 1);
    assert_eq!(scores["misses"], 2);
    assert_eq!(scores["loads"], 2);
    assert_eq!(scores["load_failures"], 1);
    assert_eq!(scores["total_entries"], 1);
    assert_eq!(scores["max_bytes"], 2048);
}

#[tokio::test]
async fn test_group_stats_unknown_group() {
    let (app, _) = create_test_app(2 << 10);

    let (status, json) = get_json(&app, "/stats/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(2 << 10);

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Live Server Test ==

#[tokio::test]
async fn test_live_server_over_tcp() {
    let (registry, loads) = scores_registry(2 << 10);
    let app = create_router(AppState::new(registry).with_base_path("/api/cache"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let url = format!("http://{}/api/cache/scores/Sam", addr);

    for _ in 0..2 {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(&response.bytes().await.unwrap()[..], b"567");
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    let stats: Value = client
        .get(format!("http://{}/stats/scores", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["hits"], 1);

    server.abort();
}
