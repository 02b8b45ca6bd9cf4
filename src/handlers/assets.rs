use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use crate::services::assets::{AddAssetRequest, AssignAssetRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(add_asset))
        .route("/:id/assign", patch(assign_asset))
        .route("/:id/return", patch(return_asset))
        .route("/:id/decommission", patch(decommission_asset))
        .route("/:id/history", get(assignment_history))
}

async fn list_assets(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.assets.list_assets(query).await?))
}

async fn add_asset(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<AddAssetRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let asset = state.assets.add_asset(request, auth.id).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

async fn assign_asset(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
    Json(request): Json<AssignAssetRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let asset = state
        .assets
        .assign_asset(item_id, request.user_id, auth.id)
        .await?;
    Ok(Json(asset))
}

async fn return_asset(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(state.assets.return_asset(item_id).await?))
}

async fn decommission_asset(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(state.assets.decommission_asset(item_id).await?))
}

async fn assignment_history(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.assets.assignment_history(item_id).await?))
}
