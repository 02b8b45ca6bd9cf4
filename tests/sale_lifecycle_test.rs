mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

use depot_api::entities::inventory_item::ItemStatus;
use depot_api::entities::user::UserRole;
use depot_api::entities::{InventoryItem, Sale};
use depot_api::errors::ServiceError;
use depot_api::handlers::common::ListQuery;
use depot_api::services::sales::{CreateSaleRequest, SaleService};

use common::{seed_customer, seed_product_model, seed_sale_item, seed_user, setup_db};

#[tokio::test]
async fn create_sale_computes_vat_totals_and_marks_items_sold() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model_a = seed_product_model(&db, "RT-AX55", Some(dec!(40))).await;
    let model_b = seed_product_model(&db, "RT-AX58", Some(dec!(60))).await;
    let item_a = seed_sale_item(&db, model_a.id, admin.id, "SN-A").await;
    let item_b = seed_sale_item(&db, model_b.id, admin.id, "SN-B").await;

    let service = SaleService::new(db.clone());
    let sale = service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item_a.id, item_b.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    assert_eq!(sale.sale.subtotal, dec!(100));
    assert_eq!(sale.sale.vat_amount, dec!(7.00));
    assert_eq!(sale.sale.total, dec!(107.00));
    assert_eq!(sale.items_sold.len(), 2);

    for item in [item_a.id, item_b.id] {
        let item = InventoryItem::find_by_id(item)
            .one(&*db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.status, ItemStatus::Sold);
        assert_eq!(item.sale_id, Some(sale.sale.id));
    }
}

#[tokio::test]
async fn unavailable_item_aborts_the_whole_sale() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", Some(dec!(50))).await;
    let item_a = seed_sale_item(&db, model.id, admin.id, "SN-A").await;
    let item_b = seed_sale_item(&db, model.id, admin.id, "SN-B").await;

    let service = SaleService::new(db.clone());
    // Sell item B on its own first.
    service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item_b.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    // A sale including the already-sold item must fail entirely.
    let err = service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item_a.id, item_b.id],
            },
            admin.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::State(_));

    // Item A stayed available; no second sale row exists.
    let item_a = InventoryItem::find_by_id(item_a.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item_a.status, ItemStatus::InStock);
    assert_eq!(item_a.sale_id, None);
    assert_eq!(Sale::find().count(&*db).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_sale_reverts_its_items_to_stock() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", Some(dec!(50))).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = SaleService::new(db.clone());
    let sale = service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    service.delete_sale(sale.sale.id).await.unwrap();

    let item = InventoryItem::find_by_id(item.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.status, ItemStatus::InStock);
    assert_eq!(item.sale_id, None);
    assert_eq!(Sale::find().count(&*db).await.unwrap(), 0);
}

#[tokio::test]
async fn updating_a_sale_swaps_the_item_set_and_recomputes_totals() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let cheap = seed_product_model(&db, "RT-AX55", Some(dec!(40))).await;
    let dear = seed_product_model(&db, "RT-AX58", Some(dec!(200))).await;
    let item_a = seed_sale_item(&db, cheap.id, admin.id, "SN-A").await;
    let item_b = seed_sale_item(&db, dear.id, admin.id, "SN-B").await;

    let service = SaleService::new(db.clone());
    let sale = service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item_a.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    let updated = service
        .update_sale(
            sale.sale.id,
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item_b.id],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.sale.subtotal, dec!(200));
    assert_eq!(updated.sale.total, dec!(214.00));

    let item_a = InventoryItem::find_by_id(item_a.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item_a.status, ItemStatus::InStock);
    assert_eq!(item_a.sale_id, None);

    let item_b = InventoryItem::find_by_id(item_b.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item_b.status, ItemStatus::Sold);
    assert_eq!(item_b.sale_id, Some(sale.sale.id));
}

#[tokio::test]
async fn missing_selling_price_counts_as_zero() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let unpriced = seed_product_model(&db, "RT-AX55", None).await;
    let item = seed_sale_item(&db, unpriced.id, admin.id, "SN-A").await;

    let service = SaleService::new(db.clone());
    let sale = service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    assert_eq!(sale.sale.subtotal, dec!(0));
    assert_eq!(sale.sale.vat_amount, dec!(0));
    assert_eq!(sale.sale.total, dec!(0));
}

#[tokio::test]
async fn listing_with_zero_limit_and_search_is_safe() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let customer = seed_customer(&db, "C-001").await;
    let model = seed_product_model(&db, "RT-AX55", Some(dec!(50))).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = SaleService::new(db.clone());
    service
        .create_sale(
            CreateSaleRequest {
                customer_id: customer.id,
                inventory_item_ids: vec![item.id],
            },
            admin.id,
        )
        .await
        .unwrap();

    // A zero page size clamps to 1 instead of panicking, and the
    // customer-name search filter still applies.
    let page = service
        .list_sales(ListQuery {
            limit: 0,
            search: Some("Customer".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.items_per_page, 1);
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.data.len(), 1);

    let none = service
        .list_sales(ListQuery {
            search: Some("no-such-customer".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(none.pagination.total_items, 0);
}

#[tokio::test]
async fn sale_requires_an_existing_customer() {
    let db = setup_db().await;
    let admin = seed_user(&db, "admin", UserRole::Admin).await;
    let model = seed_product_model(&db, "RT-AX55", Some(dec!(50))).await;
    let item = seed_sale_item(&db, model.id, admin.id, "SN-A").await;

    let service = SaleService::new(db.clone());
    let err = service
        .create_sale(
            CreateSaleRequest {
                customer_id: 9999,
                inventory_item_ids: vec![item.id],
            },
            admin.id,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let item = InventoryItem::find_by_id(item.id)
        .one(&*db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.status, ItemStatus::InStock);
}
