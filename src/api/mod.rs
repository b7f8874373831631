//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `GET /_cache/:group/:key` - Fetch a value from a group (prefix is configurable)
//! - `GET /stats` - Statistics for every group
//! - `GET /stats/:group` - Statistics for one group
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
