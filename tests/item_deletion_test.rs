mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use depot_api::entities::asset_assignment;
use depot_api::entities::user::UserRole;
use depot_api::entities::{AssetAssignment, InventoryItem};
use depot_api::errors::ServiceError;
use depot_api::services::assets::AssetService;
use depot_api::services::borrowings::{BorrowingService, CreateBorrowingRequest};
use depot_api::services::inventory_items::InventoryItemService;
use depot_api::services::sales::{CreateSaleRequest, SaleService};

use common::{seed_asset, seed_customer, seed_product_model, seed_sale_item, seed_user, setup_db};

#[tokio::test]
async fn an_available_item_can_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = InventoryItemService::new(db.clone());
    service.delete_item(item.id).await.unwrap();

    assert!(InventoryItem::find_by_id(item.id)
        .one(&*db)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn a_sold_item_cannot_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    SaleService::new(db.clone())
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    let err = InventoryItemService::new(db.clone())
        .delete_item(item.id)
        .await
        .unwrap_err();
    match err {
        ServiceError::State(msg) => assert!(msg.contains("sale"), "unexpected message: {}", msg),
        other => panic!("expected state error, got {:?}", other),
    }
}

#[tokio::test]
async fn an_actively_borrowed_item_cannot_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    BorrowingService::new(db.clone())
        .create_borrowing(
            CreateBorrowingRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
                due_date: None,
                notes: None,
            },
            admin.id,
        )
        .await
        .unwrap();

    let err = InventoryItemService::new(db.clone())
        .delete_item(item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));
}

#[tokio::test]
async fn an_assigned_asset_cannot_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    AssetService::new(db.clone())
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();

    let err = InventoryItemService::new(db.clone())
        .delete_item(asset.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));
}

#[tokio::test]
async fn deleting_a_returned_asset_removes_its_assignment_history() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let assets = AssetService::new(db.clone());
    assets
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();
    assets.return_asset(asset.id).await.unwrap();

    InventoryItemService::new(db.clone())
        .delete_item(asset.id)
        .await
        .unwrap();

    assert!(InventoryItem::find_by_id(asset.id)
        .one(&*db)
        .await
        .unwrap()
        .is_none());
    let orphaned = AssetAssignment::find()
        .filter(asset_assignment::Column::ItemId.eq(asset.id))
        .count(&*db)
        .await
        .unwrap();
    assert_eq!(orphaned, 0);
}

#[tokio::test]
async fn a_returned_borrowed_item_can_be_deleted() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let borrowings = BorrowingService::new(db.clone());
    let borrowing = borrowings
        .create_borrowing(
            CreateBorrowingRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
                due_date: None,
                notes: None,
            },
            admin.id,
        )
        .await
        .unwrap();
    borrowings
        .return_items(
            borrowing.borrowing.id,
            depot_api::services::borrowings::ReturnItemsRequest {
                item_ids_to_return: vec![item.id],
            },
        )
        .await
        .unwrap();

    InventoryItemService::new(db.clone())
        .delete_item(item.id)
        .await
        .unwrap();
}
