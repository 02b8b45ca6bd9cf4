use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::borrowing::{self, BorrowingStatus};
use crate::entities::inventory_item::{self, ItemStatus};
use crate::entities::{customer, Borrowing, Customer, InventoryItem};
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};
use crate::services::transitions::{self, LinkChange};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowingRequest {
    pub customer_id: i32,
    #[validate(length(min = 1, message = "At least one item id is required"))]
    pub inventory_item_ids: Vec<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemsRequest {
    #[validate(length(min = 1, message = "At least one item id is required to return"))]
    pub item_ids_to_return: Vec<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingResponse {
    #[serde(flatten)]
    pub borrowing: borrowing::Model,
    pub borrower: Option<customer::Model>,
    pub items: Vec<inventory_item::Model>,
}

/// Service for lending transactions. A borrowing stays BORROWED while any
/// linked item is still out; it closes exactly once, when the last item
/// comes back.
#[derive(Clone)]
pub struct BorrowingService {
    db: Arc<DbPool>,
}

impl BorrowingService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Lends the given IN_STOCK items to a customer. All-or-nothing: any
    /// unavailable item aborts the whole borrowing.
    #[instrument(skip(self, request), fields(customer_id = request.customer_id, approved_by_id))]
    pub async fn create_borrowing(
        &self,
        request: CreateBorrowingRequest,
        approved_by_id: i32,
    ) -> Result<BorrowingResponse, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;

        let borrower = Customer::find_by_id(request.customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Customer".to_string()))?;

        transitions::claim_items(&txn, &request.inventory_item_ids, ItemStatus::InStock).await?;

        let created = borrowing::ActiveModel {
            borrower_id: Set(request.customer_id),
            approved_by_id: Set(approved_by_id),
            status: Set(BorrowingStatus::Borrowed),
            borrow_date: Set(Utc::now()),
            due_date: Set(request.due_date),
            return_date: Set(None),
            notes: Set(request.notes.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        transitions::move_items(
            &txn,
            &request.inventory_item_ids,
            ItemStatus::InStock,
            ItemStatus::Borrowed,
            LinkChange::SetBorrowing(created.id),
        )
        .await?;

        let items = created.find_related(InventoryItem).all(&txn).await?;

        txn.commit().await?;

        info!(
            borrowing_id = created.id,
            item_count = items.len(),
            "borrowing created"
        );

        Ok(BorrowingResponse {
            borrowing: created,
            borrower: Some(borrower),
            items,
        })
    }

    /// Returns a subset of a borrowing's items to stock. Items keep their
    /// borrowing link for history. When no item of the borrowing remains
    /// BORROWED, the borrowing closes (RETURNED, return date set) — a
    /// one-way transition that never reverses; returning already-returned
    /// items is a no-op.
    #[instrument(skip(self, request), fields(borrowing_id))]
    pub async fn return_items(
        &self,
        borrowing_id: i32,
        request: ReturnItemsRequest,
    ) -> Result<BorrowingResponse, ServiceError> {
        request.validate()?;

        let txn = self.db.begin().await?;

        let existing = Borrowing::find_by_id(borrowing_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Borrowing".to_string()))?;

        // Only items that belong to this borrowing and are still out can
        // come back; anything else in the request is ignored.
        let returned = transitions::sweep_items(
            &txn,
            Condition::all()
                .add(inventory_item::Column::Id.is_in(request.item_ids_to_return.clone()))
                .add(inventory_item::Column::BorrowingId.eq(borrowing_id)),
            ItemStatus::Borrowed,
            ItemStatus::InStock,
            LinkChange::KeepBorrowing,
        )
        .await?;

        let remaining = transitions::count_items_in_status(
            &txn,
            Condition::all().add(inventory_item::Column::BorrowingId.eq(borrowing_id)),
            ItemStatus::Borrowed,
        )
        .await?;

        let borrowing = if remaining == 0 && existing.status == BorrowingStatus::Borrowed {
            let mut closing: borrowing::ActiveModel = existing.into();
            closing.status = Set(BorrowingStatus::Returned);
            closing.return_date = Set(Some(Utc::now()));
            closing.update(&txn).await?
        } else {
            existing
        };

        let borrower = Customer::find_by_id(borrowing.borrower_id).one(&txn).await?;
        let items = borrowing.find_related(InventoryItem).all(&txn).await?;

        txn.commit().await?;

        info!(
            borrowing_id,
            returned,
            remaining,
            closed = remaining == 0,
            "items returned"
        );

        Ok(BorrowingResponse {
            borrowing,
            borrower,
            items,
        })
    }

    pub async fn get_borrowing(&self, borrowing_id: i32) -> Result<BorrowingResponse, ServiceError> {
        let db = &*self.db;

        let (borrowing, borrower) = Borrowing::find_by_id(borrowing_id)
            .find_also_related(Customer)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Borrowing".to_string()))?;

        let items = borrowing.find_related(InventoryItem).all(db).await?;

        Ok(BorrowingResponse {
            borrowing,
            borrower,
            items,
        })
    }

    /// Lists borrowings, newest first, optionally filtered by borrower name.
    pub async fn list_borrowings(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<BorrowingResponse>, ServiceError> {
        let db = &*self.db;

        let mut finder = Borrowing::find().order_by_desc(borrowing::Column::BorrowDate);
        if let Some(term) = query.search_term() {
            finder = finder
                .join(JoinType::InnerJoin, borrowing::Relation::Borrower.def())
                .filter(customer::Column::Name.contains(term));
        }

        let paginator = finder
            .find_also_related(Customer)
            .paginate(db, query.per_page());
        let total_items = paginator.num_items().await?;
        let page_rows = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        let mut data = Vec::with_capacity(page_rows.len());
        for (borrowing, borrower) in page_rows {
            let items = borrowing.find_related(InventoryItem).all(db).await?;
            data.push(BorrowingResponse {
                borrowing,
                borrower,
                items,
            });
        }

        Ok(PaginatedResponse::new(data, &query, total_items))
    }
}
