use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::{check_login, AuthenticatedUser};
use crate::entities::user::{self, UserRole};
use crate::errors::ServiceError;
use crate::services::users::CreateUserRequest;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: AuthenticatedUser,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    let user = state
        .users
        .find_by_username(&request.username)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    check_login(&user, &request.password)?;

    let token = state.auth.issue_token(&user)?;
    info!(user_id = user.id, "login succeeded");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: public_identity(&user),
    }))
}

/// Self-registration always produces an EMPLOYEE account; elevated roles
/// are granted by a super admin through user administration.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    let created = state
        .users
        .create_user(CreateUserRequest {
            username: request.username,
            email: request.email,
            password: request.password,
            name: request.name,
            role: UserRole::Employee,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

fn public_identity(user: &user::Model) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
        role: user.role,
    }
}
