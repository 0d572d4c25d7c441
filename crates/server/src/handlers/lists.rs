//! List handlers

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
pub struct ListTitleRequest {
    #[serde(default, rename = "listTitle")]
    pub list_title: String,
}

/// GET /get-list
pub async fn get_list(State(state): State<AppState>, ctx: Ctx) -> Result<impl IntoResponse> {
    let lists = state.store.lists(ctx.account_id()).await?;

    Ok(Json(json!({ "success": true, "list": lists })))
}

/// POST /add-list
pub async fn add_list(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<ListTitleRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /add-list - {}", ctx.username());

    state
        .store
        .create_list(ctx.account_id(), &req.list_title)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// PUT /edit-list/{id}
pub async fn edit_list(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
    Json(req): Json<ListTitleRequest>,
) -> Result<impl IntoResponse> {
    info!("PUT /edit-list/{}", id);

    state
        .store
        .update_list(ctx.account_id(), &id, &req.list_title)
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /delete-list/{id}
pub async fn delete_list(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("DELETE /delete-list/{}", id);

    state.store.delete_list(ctx.account_id(), &id).await?;

    Ok(Json(json!({ "success": true })))
}
