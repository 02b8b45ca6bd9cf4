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
use crate::services::users::{
    ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest, UpdateStatusRequest,
    UpdateUserRequest,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me/profile", patch(update_profile))
        .route("/me/password", patch(change_password))
        .route("/:id", axum::routing::put(update_user).delete(delete_user))
        .route("/:id/status", patch(update_status))
}

async fn list_users(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    Ok(Json(state.users.list_users(query).await?))
}

async fn create_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    let created = state.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    Ok(Json(state.users.update_user(user_id, request).await?))
}

async fn update_status(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    if auth.id == user_id {
        return Err(ServiceError::Validation(
            "You cannot change your own account status".to_string(),
        ));
    }
    Ok(Json(state.users.update_status(user_id, request).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_super_admin()?;
    if auth.id == user_id {
        return Err(ServiceError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }
    state.users.delete_user(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.users.update_profile(auth.id, request).await?))
}

async fn change_password(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state.users.change_password(auth.id, request).await?;
    Ok(Json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}
