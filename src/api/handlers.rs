//! API Handlers
//!
//! HTTP request handlers for each item store endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::metrics::Metrics;
use crate::models::{CreateItemRequest, DeleteResponse, HealthResponse};
use crate::store::{Item, ItemStore, SharedStore};

/// Application state shared across all handlers.
///
/// Holds the store behind its trait object and the metrics sink.
#[derive(Clone)]
pub struct AppState {
    /// Store backend
    pub store: SharedStore,
    /// Request and sweep counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Creates a new AppState from a shared store and metrics sink.
    pub fn new(store: SharedStore, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Wraps a concrete store with a fresh metrics registry.
    pub fn with_store(store: impl ItemStore + 'static) -> prometheus::Result<Self> {
        Ok(Self::new(Arc::new(store), Arc::new(Metrics::new()?)))
    }
}

/// Handler for GET /items
///
/// Lists every stored item.
pub async fn list_items_handler(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.store.list().await)
}

/// Handler for POST /items
///
/// Creates an item that expires after `ttl_seconds`.
pub async fn create_item_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>)> {
    if let Some(error_msg) = req.validate() {
        return Err(StoreError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    let item = state.store.create(req.name, ttl).await?;
    info!(item_id = %item.id, "item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for GET /items/:id
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = state.store.get(&id).await?;
    Ok(Json(item))
}

/// Handler for DELETE /items/:id
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete(&id).await?;
    info!(item_id = %id, "item deleted");

    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /health
///
/// Liveness only; does not touch the store.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handler for GET /ready
///
/// 200 while the store can serve requests, 503 otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    if !state.store.ready().await {
        return Err(StoreError::Unavailable("not ready".to_string()));
    }
    Ok(Json(HealthResponse::ready()))
}

/// Handler for GET /metrics
///
/// Prometheus text exposition of the request and cleanup metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {err}"),
        )
            .into_response(),
    }
}
