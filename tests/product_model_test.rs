mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;

use depot_api::entities::user::UserRole;
use depot_api::entities::ProductModel;
use depot_api::errors::ServiceError;
use depot_api::handlers::common::ListQuery;
use depot_api::services::inventory_items::InventoryItemService;
use depot_api::services::product_models::{CreateProductModelRequest, ProductModelService};

use common::{seed_product_model, seed_sale_item, seed_user, setup_db};

#[tokio::test]
async fn created_model_is_fetched_with_category_and_brand() {
    let db = setup_db().await;
    // Seed one model to get a category and brand to attach to.
    let existing = seed_product_model(&db, "RT-AX55", Some(dec!(40))).await;

    let service = ProductModelService::new(db.clone());
    let created = service
        .create_product_model(CreateProductModelRequest {
            model_number: "RT-AX58".to_string(),
            description: Some("dual-band router".to_string()),
            selling_price: Some(dec!(99.50)),
            category_id: existing.category_id,
            brand_id: existing.brand_id,
        })
        .await
        .unwrap();
    assert_eq!(created.selling_price, Some(dec!(99.50)));

    let fetched = service.get_product_model(created.id).await.unwrap();
    assert_eq!(fetched.model.model_number, "RT-AX58");
    assert_eq!(
        fetched.category.map(|c| c.id),
        Some(existing.category_id)
    );
    assert_eq!(fetched.brand.map(|b| b.id), Some(existing.brand_id));
}

#[tokio::test]
async fn duplicate_model_number_is_a_unique_violation() {
    let db = setup_db().await;
    let existing = seed_product_model(&db, "RT-AX55", None).await;

    let service = ProductModelService::new(db.clone());
    let err = service
        .create_product_model(CreateProductModelRequest {
            model_number: "RT-AX55".to_string(),
            description: None,
            selling_price: None,
            category_id: existing.category_id,
            brand_id: existing.brand_id,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::UniqueViolation { .. });
}

#[tokio::test]
async fn model_referenced_by_items_cannot_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = ProductModelService::new(db.clone());
    let err = service.delete_product_model(model.id).await.unwrap_err();
    assert_matches!(err, ServiceError::State(_));

    // Once the last referencing item is gone the model can be deleted.
    InventoryItemService::new(db.clone())
        .delete_item(item.id)
        .await
        .unwrap();
    service.delete_product_model(model.id).await.unwrap();
    assert!(ProductModel::find_by_id(model.id)
        .one(&*db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn update_replaces_price_and_rejects_missing_refs() {
    let db = setup_db().await;
    let model = seed_product_model(&db, "RT-AX55", Some(dec!(40))).await;

    let service = ProductModelService::new(db.clone());
    let updated = service
        .update_product_model(
            model.id,
            CreateProductModelRequest {
                model_number: "RT-AX55".to_string(),
                description: None,
                selling_price: Some(dec!(55)),
                category_id: model.category_id,
                brand_id: model.brand_id,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.selling_price, Some(dec!(55)));

    let err = service
        .update_product_model(
            model.id,
            CreateProductModelRequest {
                model_number: "RT-AX55".to_string(),
                description: None,
                selling_price: None,
                category_id: 9999,
                brand_id: model.brand_id,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn listing_searches_and_sorts_the_full_catalog() {
    let db = setup_db().await;
    seed_product_model(&db, "ZX-900", None).await;
    let ax = seed_product_model(&db, "RT-AX55", None).await;

    let service = ProductModelService::new(db.clone());
    service
        .create_product_model(CreateProductModelRequest {
            model_number: "AP-200".to_string(),
            description: Some("ceiling access point".to_string()),
            selling_price: None,
            category_id: ax.category_id,
            brand_id: ax.brand_id,
        })
        .await
        .unwrap();

    // Full catalog comes back in model-number order.
    let all = service.list_all().await.unwrap();
    let numbers: Vec<&str> = all.iter().map(|m| m.model.model_number.as_str()).collect();
    assert_eq!(numbers, vec!["AP-200", "RT-AX55", "ZX-900"]);

    // Search matches the description too.
    let page = service
        .list_product_models(ListQuery {
            search: Some("ceiling".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.data[0].model.model_number, "AP-200");
}
