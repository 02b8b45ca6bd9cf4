use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::inventory_item::{self, ItemStatus};
use crate::entities::{customer, product_model, sale, Customer, InventoryItem, ProductModel, Sale};
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};
use crate::services::transitions::{self, LinkChange};

/// VAT rate applied to every sale.
pub const VAT_RATE: Decimal = dec!(0.07);

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_id: i32,
    #[validate(length(min = 1, message = "At least one item id is required"))]
    pub inventory_item_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    #[serde(flatten)]
    pub sale: sale::Model,
    pub customer: Option<customer::Model>,
    pub items_sold: Vec<inventory_item::Model>,
}

/// Service for sale transactions: each operation is one atomic unit that
/// keeps item status and sale linkage consistent.
#[derive(Clone)]
pub struct SaleService {
    db: Arc<DbPool>,
}

impl SaleService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Creates a sale of the given IN_STOCK items. Availability is
    /// re-checked inside the transaction; any unavailable item aborts the
    /// whole sale.
    #[instrument(skip(self, request), fields(customer_id = request.customer_id, sold_by_id))]
    pub async fn create_sale(
        &self,
        request: CreateSaleRequest,
        sold_by_id: i32,
    ) -> Result<SaleResponse, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;

        let customer = Customer::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer".to_string()))?;

        let items =
            transitions::claim_items(&txn, &request.inventory_item_ids, ItemStatus::InStock)
                .await?;

        let (subtotal, vat_amount, total) = compute_totals(&txn, &items).await?;

        let new_sale = sale::ActiveModel {
            customer_id: Set(request.customer_id),
            sold_by_id: Set(sold_by_id),
            subtotal: Set(subtotal),
            vat_amount: Set(vat_amount),
            total: Set(total),
            sale_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        transitions::move_items(
            &txn,
            &request.inventory_item_ids,
            ItemStatus::InStock,
            ItemStatus::Sold,
            LinkChange::SetSale(new_sale.id),
        )
        .await?;

        let items_sold = new_sale.find_related(InventoryItem).all(&txn).await?;

        txn.commit().await?;

        info!(sale_id = new_sale.id, %subtotal, %total, "sale created");

        Ok(SaleResponse {
            sale: new_sale,
            customer: Some(customer),
            items_sold,
        })
    }

    /// Replaces the full item set of an existing sale: previously linked
    /// items revert to IN_STOCK, the new set is validated and linked, and
    /// totals are recomputed.
    #[instrument(skip(self, request), fields(sale_id))]
    pub async fn update_sale(
        &self,
        sale_id: i32,
        request: CreateSaleRequest,
    ) -> Result<SaleResponse, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;

        let existing = Sale::find_by_id(sale_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Sale".to_string()))?;

        let customer = Customer::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer".to_string()))?;

        transitions::sweep_items(
            &txn,
            Condition::all().add(inventory_item::Column::SaleId.eq(sale_id)),
            ItemStatus::Sold,
            ItemStatus::InStock,
            LinkChange::ClearSale,
        )
        .await?;

        let items =
            transitions::claim_items(&txn, &request.inventory_item_ids, ItemStatus::InStock)
                .await?;
        let (subtotal, vat_amount, total) = compute_totals(&txn, &items).await?;

        transitions::move_items(
            &txn,
            &request.inventory_item_ids,
            ItemStatus::InStock,
            ItemStatus::Sold,
            LinkChange::SetSale(sale_id),
        )
        .await?;

        let mut updated: sale::ActiveModel = existing.into();
        updated.customer_id = Set(request.customer_id);
        updated.subtotal = Set(subtotal);
        updated.vat_amount = Set(vat_amount);
        updated.total = Set(total);
        let updated = updated.update(&txn).await?;

        let items_sold = updated.find_related(InventoryItem).all(&txn).await?;

        txn.commit().await?;

        info!(sale_id, %subtotal, %total, "sale updated");

        Ok(SaleResponse {
            sale: updated,
            customer: Some(customer),
            items_sold,
        })
    }

    /// Deletes a sale, reverting every linked item to IN_STOCK first.
    /// Hard delete: no audit trail survives the removal.
    #[instrument(skip(self), fields(sale_id))]
    pub async fn delete_sale(&self, sale_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let existing = Sale::find_by_id(sale_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Sale".to_string()))?;

        let reverted = transitions::sweep_items(
            &txn,
            Condition::all().add(inventory_item::Column::SaleId.eq(sale_id)),
            ItemStatus::Sold,
            ItemStatus::InStock,
            LinkChange::ClearSale,
        )
        .await?;

        existing.delete(&txn).await?;

        txn.commit().await?;

        info!(sale_id, reverted, "sale deleted, items reverted to stock");
        Ok(())
    }

    pub async fn get_sale(&self, sale_id: i32) -> Result<SaleResponse, ServiceError> {
        let db = &*self.db;

        let (sale, customer) = Sale::find_by_id(sale_id)
            .find_also_related(Customer)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Sale".to_string()))?;

        let items_sold = sale.find_related(InventoryItem).all(db).await?;

        Ok(SaleResponse {
            sale,
            customer,
            items_sold,
        })
    }

    /// Lists sales, newest first, optionally filtered by customer name.
    pub async fn list_sales(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<SaleResponse>, ServiceError> {
        let db = &*self.db;

        let mut finder = Sale::find().order_by_desc(sale::Column::SaleDate);
        if let Some(term) = query.search_term() {
            finder = finder
                .join(JoinType::InnerJoin, sale::Relation::Customer.def())
                .filter(customer::Column::Name.contains(term));
        }

        let paginator = finder
            .find_also_related(Customer)
            .paginate(db, query.per_page());
        let total_items = paginator.num_items().await?;
        let page_rows = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        let mut data = Vec::with_capacity(page_rows.len());
        for (sale, customer) in page_rows {
            let items_sold = sale.find_related(InventoryItem).all(db).await?;
            data.push(SaleResponse {
                sale,
                customer,
                items_sold,
            });
        }

        Ok(PaginatedResponse::new(data, &query, total_items))
    }
}

/// Computes `(subtotal, vat, total)` for a set of claimed items from their
/// product models' selling prices. A missing price counts as zero.
async fn compute_totals<C: ConnectionTrait>(
    conn: &C,
    items: &[inventory_item::Model],
) -> Result<(Decimal, Decimal, Decimal), ServiceError> {
    let model_ids: Vec<i32> = items.iter().map(|i| i.product_model_id).collect();
    let prices: HashMap<i32, Option<Decimal>> = ProductModel::find()
        .filter(product_model::Column::Id.is_in(model_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, m.selling_price))
        .collect();

    let subtotal: Decimal = items
        .iter()
        .map(|item| {
            prices
                .get(&item.product_model_id)
                .copied()
                .flatten()
                .unwrap_or(Decimal::ZERO)
        })
        .sum();
    let vat_amount = subtotal * VAT_RATE;
    let total = subtotal + vat_amount;

    Ok((subtotal, vat_amount, total))
}
