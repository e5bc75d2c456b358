//! Order endpoints.

use super::{
    AppState,
    error::{ApiError, ApiResult},
};
use crate::{
    core::{
        order,
        validation::{OrderChanges, OrderDraft},
    },
    models::{ListOrdersOptions, Order, OrderWithProducts},
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
use tracing::debug;

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListOrdersOptions>, QueryRejection>,
) -> ApiResult<Json<Vec<Order>>> {
    let Query(options) = query?;
    debug!(?options, "Listing orders");
    Ok(Json(order::list_orders(&state.db, &options).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderWithProducts>> {
    order::get_order(&state.db, &id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Order not found"))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<OrderDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderWithProducts>)> {
    let Json(draft) = body?;
    let created = order::create_order(&state.db, draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<OrderChanges>, JsonRejection>,
) -> ApiResult<Json<OrderWithProducts>> {
    let Json(changes) = body?;
    order::edit_order(&state.db, &id, changes)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Order not found"))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    match order::destroy_order(&state.db, &id).await? {
        0 => Err(ApiError::NotFound("Order not found")),
        _ => Ok(Json(json!({
            "success": true,
            "message": "Order deleted successfully"
        }))),
    }
}
