//! Item handlers

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::Result;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    #[serde(default)]
    pub list_id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct EditItemRequest {
    #[serde(default)]
    pub description: String,
}

/// GET /get-items/{list_id}
pub async fn get_items(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(list_id): Path<String>,
) -> Result<impl IntoResponse> {
    let items = state.store.items(ctx.account_id(), &list_id).await?;

    Ok(Json(json!({ "success": true, "items": items })))
}

/// POST /add-items
pub async fn add_items(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<AddItemsRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /add-items - list {}", req.list_id);

    state
        .store
        .create_item(ctx.account_id(), &req.list_id, &req.description)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// PUT /edit-item/{id}
pub async fn edit_item(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(req): Json<EditItemRequest>,
) -> Result<impl IntoResponse> {
    info!("PUT /edit-item/{}", id);

    state
        .store
        .update_item(ctx.account_id(), &id, &req.description)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /delete-item/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("DELETE /delete-item/{}", id);

    state.store.delete_item(ctx.account_id(), &id).await?;

    Ok(Json(json!({ "success": true })))
}
