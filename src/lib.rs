//! Inventory, sales, and asset management backend.
//!
//! Every unit of stock is one row in `inventory_items`, moved through a
//! fixed status lifecycle by sale, borrowing, and asset-assignment
//! transactions. Handlers stay thin; the services own all state
//! transitions and run them atomically.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::assets::AssetService;
use crate::services::borrowings::BorrowingService;
use crate::services::inventory_items::InventoryItemService;
use crate::services::product_models::ProductModelService;
use crate::services::sales::SaleService;
use crate::services::users::UserService;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub inventory_items: InventoryItemService,
    pub product_models: ProductModelService,
    pub assets: AssetService,
    pub sales: SaleService,
    pub borrowings: BorrowingService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let auth = Arc::new(AuthService::new(
            &config.jwt_secret,
            config.jwt_expiration,
        ));
        Self {
            users: UserService::new(db.clone()),
            inventory_items: InventoryItemService::new(db.clone()),
            product_models: ProductModelService::new(db.clone()),
            assets: AssetService::new(db.clone()),
            sales: SaleService::new(db.clone()),
            borrowings: BorrowingService::new(db.clone()),
            db,
            config,
            auth,
        }
    }
}

/// All `/api` routes, grouped per resource.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", handlers::auth::routes())
        .nest("/users", handlers::users::routes())
        .nest("/inventory-items", handlers::inventory_items::routes())
        .nest("/product-models", handlers::product_models::routes())
        .nest("/assets", handlers::assets::routes())
        .nest("/sales", handlers::sales::routes())
        .nest("/borrowings", handlers::borrowings::routes())
}

/// The full application router, including the health probe.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}
