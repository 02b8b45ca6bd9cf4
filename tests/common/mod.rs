#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use sea_orm_migration::MigratorTrait;

use depot_api::auth::hash_password;
use depot_api::db::DbPool;
use depot_api::entities::inventory_item::{self, ItemStatus, ItemType};
use depot_api::entities::user::{AccountStatus, UserRole};
use depot_api::entities::{brand, category, customer, product_model, user};
use depot_api::migrator::Migrator;

/// Fresh in-memory database with the full schema. A single connection is
/// required so every query sees the same in-memory instance.
pub async fn setup_db() -> Arc<DbPool> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(db)
}

pub async fn seed_user(db: &DbPool, username: &str, role: UserRole) -> user::Model {
    user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(format!("{}@example.com", username)),
        password: Set(hash_password("test-password-123").expect("hash")),
        name: Set(username.to_string()),
        role: Set(role),
        account_status: Set(AccountStatus::Active),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

pub async fn seed_customer(db: &DbPool, code: &str) -> customer::Model {
    customer::ActiveModel {
        customer_code: Set(code.to_string()),
        name: Set(format!("Customer {}", code)),
        phone: Set(None),
        email: Set(None),
        address: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed customer")
}

/// Seeds a category + brand + product model in one go.
pub async fn seed_product_model(
    db: &DbPool,
    model_number: &str,
    selling_price: Option<Decimal>,
) -> product_model::Model {
    let cat = category::ActiveModel {
        name: Set(format!("category-{}", model_number)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed category");

    let brand = brand::ActiveModel {
        name: Set(format!("brand-{}", model_number)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed brand");

    product_model::ActiveModel {
        model_number: Set(model_number.to_string()),
        description: Set(None),
        selling_price: Set(selling_price),
        category_id: Set(cat.id),
        brand_id: Set(brand.id),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed product model")
}

/// Seeds a sellable unit in IN_STOCK.
pub async fn seed_sale_item(
    db: &DbPool,
    product_model_id: i32,
    added_by_id: i32,
    serial: &str,
) -> inventory_item::Model {
    inventory_item::ActiveModel {
        item_type: Set(ItemType::Sale),
        status: Set(ItemStatus::InStock),
        serial_number: Set(Some(serial.to_string())),
        mac_address: Set(None),
        asset_code: Set(None),
        product_model_id: Set(product_model_id),
        added_by_id: Set(added_by_id),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed sale item")
}

/// Seeds an asset in IN_WAREHOUSE.
pub async fn seed_asset(
    db: &DbPool,
    product_model_id: i32,
    added_by_id: i32,
    asset_code: &str,
) -> inventory_item::Model {
    inventory_item::ActiveModel {
        item_type: Set(ItemType::Asset),
        status: Set(ItemStatus::InWarehouse),
        serial_number: Set(None),
        mac_address: Set(None),
        asset_code: Set(Some(asset_code.to_string())),
        product_model_id: Set(product_model_id),
        added_by_id: Set(added_by_id),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed asset")
}
