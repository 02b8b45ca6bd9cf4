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
use crate::services::product_models::CreateProductModelRequest;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_product_models).post(create_product_model))
        .route(
            "/:id",
            get(get_product_model)
                .put(update_product_model)
                .delete(delete_product_model),
        )
}

/// With `all=true` the full catalog is returned in model-number order for
/// pickers; otherwise the listing is paginated.
async fn list_product_models(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    if query.all {
        let data = state.product_models.list_all().await?;
        return Ok(Json(serde_json::json!({ "data": data })).into_response());
    }
    let page = state.product_models.list_product_models(query).await?;
    Ok(Json(page).into_response())
}

async fn get_product_model(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Path(model_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.product_models.get_product_model(model_id).await?))
}

async fn create_product_model(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<CreateProductModelRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    let created = state.product_models.create_product_model(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product_model(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(model_id): Path<i32>,
    Json(request): Json<CreateProductModelRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    Ok(Json(
        state
            .product_models
            .update_product_model(model_id, request)
            .await?,
    ))
}

async fn delete_product_model(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(model_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    auth.require_admin()?;
    state.product_models.delete_product_model(model_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
