use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use crate::services::inventory_items::{AddItemRequest, UpdateItemRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(add_item))
        .route(
            "/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

/// With `all=true` the full available (IN_STOCK) set is returned for
/// pickers; otherwise the listing is paginated.
async fn list_items(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    if query.all {
        let data = state
            .inventory_items
            .list_available(query.search_term())
            .await?;
        return Ok(Json(serde_json::json!({ "data": data })).into_response());
    }
    let page = state.inventory_items.list_items(query).await?;
    Ok(Json(page).into_response())
}

async fn get_item(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.inventory_items.get_item(item_id).await?))
}

async fn add_item(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<AddItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let item = state.inventory_items.add_item(request, auth.id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(
        state.inventory_items.update_item(item_id, request).await?,
    ))
}

async fn delete_item(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    state.inventory_items.delete_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
