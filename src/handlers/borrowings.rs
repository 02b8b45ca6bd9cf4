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
use crate::services::borrowings::{CreateBorrowingRequest, ReturnItemsRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_borrowings).post(create_borrowing))
        .route("/:id", get(get_borrowing))
        .route("/:id/return", patch(return_items))
}

async fn list_borrowings(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.borrowings.list_borrowings(query).await?))
}

async fn get_borrowing(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(borrowing_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.borrowings.get_borrowing(borrowing_id).await?))
}

async fn create_borrowing(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<CreateBorrowingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let borrowing = state.borrowings.create_borrowing(request, auth.id).await?;
    Ok((StatusCode::CREATED, Json(borrowing)))
}

async fn return_items(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(borrowing_id): Path<i32>,
    Json(request): Json<ReturnItemsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(
        state.borrowings.return_items(borrowing_id, request).await?,
    ))
}
