//! API Routes
//!
//! Configures the Axum router with all item store endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_item_handler, delete_item_handler, get_item_handler, health_handler,
    list_items_handler, metrics_handler, ready_handler, AppState,
};
use super::middleware::track_metrics;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /items` - List items
/// - `POST /items` - Create an item
/// - `GET /items/:id` - Fetch one item
/// - `DELETE /items/:id` - Delete one item
/// - `GET /health` - Liveness probe
/// - `GET /ready` - Readiness probe
/// - `GET /metrics` - Prometheus request and cleanup metrics
///
/// # Middleware
/// - Metrics: Records every routed request against its matched path
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/items", get(list_items_handler).post(create_item_handler))
        .route(
            "/items/:id",
            get(get_item_handler).delete(delete_item_handler),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
