//! HTTP/JSON surface over the repositories.
//!
//! Handlers only translate between HTTP and repository calls; absence becomes
//! 404 and errors are mapped in [`error::ApiError`].

pub mod error;
pub mod orders;
pub mod products;

use crate::core::product::ProductRepository;
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared handler state, cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Product access with snapshot fallback
    pub products: ProductRepository,
    /// Primary store handle for order access
    pub db: Arc<DatabaseConnection>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::edit)
                .delete(products::destroy),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get).put(orders::edit).delete(orders::destroy),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}
