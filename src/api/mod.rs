//! API Module
//!
//! HTTP handlers and routing for the item store REST API.
//!
//! # Endpoints
//! - `GET /items`, `POST /items` - List and create items
//! - `GET /items/:id`, `DELETE /items/:id` - Fetch and delete one item
//! - `GET /health`, `GET /ready` - Liveness and readiness probes
//! - `GET /metrics` - Prometheus request and cleanup metrics

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
