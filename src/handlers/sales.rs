use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::handlers::common::ListQuery;
use crate::services::sales::CreateSaleRequest;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route(
            "/:id",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
}

async fn list_sales(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.sales.list_sales(query).await?))
}

async fn get_sale(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(sale_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.sales.get_sale(sale_id).await?))
}

async fn create_sale(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let sale = state.sales.create_sale(request, auth.id).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn update_sale(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(sale_id): Path<i32>,
    Json(request): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(state.sales.update_sale(sale_id, request).await?))
}

/// Deleting a sale is destructive (items revert to stock, no audit row
/// remains), so it is reserved for super admins.
async fn delete_sale(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(sale_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    state.sales.delete_sale(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
