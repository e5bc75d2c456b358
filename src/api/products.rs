//! Product endpoints.

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::{
    core::validation::{ProductChanges, ProductDraft},
    models::{ListProductsOptions, Product},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListProductsOptions>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(options) = query?;
    Ok(Json(state.products.list(&options).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .products
        .get(&id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ProductDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(draft) = body?;
    let product = state.products.create(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductChanges>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(changes) = body?;
    state
        .products
        .edit(&id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    match state.products.destroy(&id).await? {
        0 => Err(ApiError::NotFound("Product not found")),
        _ => Ok(Json(json!({
            "success": true,
            "message": "Product deleted successfully"
        }))),
    }
}
