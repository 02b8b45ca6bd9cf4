mod common;

use sea_orm::EntityTrait;

use depot_api::entities::inventory_item::ItemStatus;
use depot_api::entities::user::UserRole;
use depot_api::entities::InventoryItem;
use depot_api::errors::ServiceError;
use depot_api::services::assets::AssetService;

use common::{seed_asset, seed_product_model, seed_sale_item, seed_user, setup_db};

#[tokio::test]
async fn assigning_an_asset_opens_an_assignment_record() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let service = AssetService::new(db.clone());
    let assigned = service
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();

    assert_eq!(assigned.status, ItemStatus::Assigned);
    assert_eq!(assigned.assigned_to_id, Some(employee.id));

    let history = service.assignment_history(asset.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].assignee_id, employee.id);
    assert!(history[0].returned_at.is_none());
}

#[tokio::test]
async fn an_assigned_asset_cannot_be_assigned_again() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let other = seed_user(&db, "other", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let service = AssetService::new(db.clone());
    service
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();

    let err = service
        .assign_asset(asset.id, other.id, admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));

    // First assignment is untouched.
    let history = service.assignment_history(asset.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].assignee_id, employee.id);
}

#[tokio::test]
async fn returning_an_asset_closes_the_record_and_keeps_history() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let other = seed_user(&db, "other", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let service = AssetService::new(db.clone());
    service
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();
    let returned = service.return_asset(asset.id).await.unwrap();

    assert_eq!(returned.status, ItemStatus::InWarehouse);
    assert_eq!(returned.assigned_to_id, None);

    // Reassignment after a return creates a second history period.
    service
        .assign_asset(asset.id, other.id, admin.id)
        .await
        .unwrap();

    let history = service.assignment_history(asset.id).await.unwrap();
    assert_eq!(history.len(), 2);
    let open: Vec<_> = history.iter().filter(|r| r.returned_at.is_none()).collect();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].assignee_id, other.id);
}

#[tokio::test]
async fn decommissioning_is_terminal() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let service = AssetService::new(db.clone());
    service
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .unwrap();
    let decommissioned = service.decommission_asset(asset.id).await.unwrap();

    assert_eq!(decommissioned.status, ItemStatus::Decommissioned);
    // The open assignment was closed on the way out.
    let history = service.assignment_history(asset.id).await.unwrap();
    assert!(history.iter().all(|r| r.returned_at.is_some()));

    // No operation brings it back.
    assert!(service
        .assign_asset(asset.id, employee.id, admin.id)
        .await
        .is_err());
    assert!(service.return_asset(asset.id).await.is_err());
    assert!(service.decommission_asset(asset.id).await.is_err());

    let row = InventoryItem::find_by_id(asset.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ItemStatus::Decommissioned);
}

#[tokio::test]
async fn sale_type_items_are_rejected_by_asset_operations() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let employee = seed_user(&db, "employee", UserRole::Employee).await;
    let model = seed_product_model(&db, "RT-AX55", None).await;
    let stock_item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = AssetService::new(db.clone());
    let err = service
        .assign_asset(stock_item.id, employee.id, admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::State(_)));
}

#[tokio::test]
async fn assigning_to_a_missing_user_fails() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let model = seed_product_model(&db, "LT-100", None).await;
    let asset = seed_asset(&db, model.id, admin.id, "AC-0001").await;

    let service = AssetService::new(db.clone());
    let err = service
        .assign_asset(asset.id, 9999, admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    // Nothing moved.
    let row = InventoryItem::find_by_id(asset.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ItemStatus::InWarehouse);
    assert!(service.assignment_history(asset.id).await.unwrap().is_empty());
}
