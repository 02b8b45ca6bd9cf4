use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::asset_assignment;
use crate::entities::inventory_item::{self, ItemStatus, ItemType};
use crate::entities::{product_model, AssetAssignment, InventoryItem, ProductModel};
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
    pub product_model_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
    pub status: Option<ItemStatus>,
    pub product_model_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: inventory_item::Model,
    pub product_model: Option<product_model::Model>,
}

/// Statuses an operator may set directly through the update endpoint.
/// SOLD, BORROWED, and ASSIGNED are owned by their transactions and can
/// only be reached through them.
const FREE_STATUSES: [ItemStatus; 4] = [
    ItemStatus::InStock,
    ItemStatus::InWarehouse,
    ItemStatus::Defective,
    ItemStatus::Decommissioned,
];

/// Service for sale-type inventory CRUD and the item deletion guard.
#[derive(Clone)]
pub struct InventoryItemService {
    db: Arc<DbPool>,
}

impl InventoryItemService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Adds a sellable unit to stock.
    #[instrument(skip(self, request), fields(added_by_id))]
    pub async fn add_item(
        &self,
        request: AddItemRequest,
        added_by_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = inventory_item::ActiveModel {
            item_type: Set(ItemType::Sale),
            status: Set(ItemStatus::InStock),
            serial_number: Set(request.serial_number),
            mac_address: Set(request.mac_address),
            product_model_id: Set(request.product_model_id),
            added_by_id: Set(added_by_id),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::classify_unique(e, &["serial_number", "mac_address"]))?;

        info!(item_id = item.id, "inventory item added");
        Ok(item)
    }

    pub async fn get_item(&self, item_id: i32) -> Result<ItemResponse, ServiceError> {
        let (item, product_model) = InventoryItem::find_by_id(item_id)
            .find_also_related(ProductModel)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item".to_string()))?;

        Ok(ItemResponse {
            item,
            product_model,
        })
    }

    /// Updates identifying fields, and optionally the status — but only
    /// between the statuses not owned by a sale/borrowing/assignment
    /// transaction.
    #[instrument(skip(self, request), fields(item_id))]
    pub async fn update_item(
        &self,
        item_id: i32,
        request: UpdateItemRequest,
    ) -> Result<inventory_item::Model, ServiceError> {
        let existing = InventoryItem::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item".to_string()))?;

        if let Some(new_status) = request.status {
            if new_status != existing.status
                && !(FREE_STATUSES.contains(&existing.status)
                    && FREE_STATUSES.contains(&new_status))
            {
                return Err(ServiceError::State(format!(
                    "Status cannot be changed from {} to {} outside its transaction",
                    existing.status.as_str(),
                    new_status.as_str()
                )));
            }
        }

        let mut updated: inventory_item::ActiveModel = existing.into();
        updated.serial_number = Set(request.serial_number);
        updated.mac_address = Set(request.mac_address);
        if let Some(status) = request.status {
            updated.status = Set(status);
        }
        if let Some(model_id) = request.product_model_id {
            updated.product_model_id = Set(model_id);
        }
        updated.updated_at = Set(Utc::now());

        let item = updated
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::classify_unique(e, &["serial_number", "mac_address"]))?;

        info!(item_id, "inventory item updated");
        Ok(item)
    }

    /// Deletes an item if nothing blocks it. The blocking reason is
    /// classified so callers can tell a sold item from an actively
    /// borrowed or assigned one. Dependent closed assignment rows are
    /// removed first, inside the same transaction.
    #[instrument(skip(self), fields(item_id))]
    pub async fn delete_item(&self, item_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let item = InventoryItem::find_by_id(item_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Item".to_string()))?;

        match item.status {
            ItemStatus::Sold => {
                return Err(ServiceError::State(format!(
                    "Item {} is part of a sale and cannot be deleted",
                    item_id
                )));
            }
            ItemStatus::Borrowed => {
                return Err(ServiceError::State(format!(
                    "Item {} is actively borrowed and cannot be deleted",
                    item_id
                )));
            }
            ItemStatus::Assigned => {
                return Err(ServiceError::State(format!(
                    "Item {} is actively assigned and cannot be deleted",
                    item_id
                )));
            }
            _ => {}
        }

        // Historical (closed) assignment rows reference the item; remove
        // them explicitly rather than relying on cascading deletes.
        AssetAssignment::delete_many()
            .filter(asset_assignment::Column::ItemId.eq(item_id))
            .exec(&txn)
            .await?;

        item.delete(&txn).await?;

        txn.commit().await?;

        info!(item_id, "inventory item deleted");
        Ok(())
    }

    /// Lists all available (IN_STOCK) sale items, for pickers that need
    /// the full set rather than a page.
    pub async fn list_available(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ItemResponse>, ServiceError> {
        let mut finder = InventoryItem::find()
            .filter(inventory_item::Column::Status.eq(ItemStatus::InStock))
            .order_by_desc(inventory_item::Column::UpdatedAt);

        if let Some(term) = search {
            finder = finder
                .join(
                    JoinType::InnerJoin,
                    inventory_item::Relation::ProductModel.def(),
                )
                .filter(
                    Condition::any()
                        .add(inventory_item::Column::SerialNumber.contains(term))
                        .add(inventory_item::Column::MacAddress.eq(term))
                        .add(product_model::Column::ModelNumber.contains(term)),
                );
        }

        let rows = finder
            .find_also_related(ProductModel)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(item, product_model)| ItemResponse {
                item,
                product_model,
            })
            .collect())
    }

    /// Paginated item listing with search and status filter.
    pub async fn list_items(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<ItemResponse>, ServiceError> {
        let db = &*self.db;

        let mut finder =
            InventoryItem::find().order_by_desc(inventory_item::Column::UpdatedAt);

        if let Some(term) = query.search_term() {
            finder = finder
                .join(
                    JoinType::InnerJoin,
                    inventory_item::Relation::ProductModel.def(),
                )
                .filter(
                    Condition::any()
                        .add(inventory_item::Column::SerialNumber.contains(term))
                        .add(inventory_item::Column::MacAddress.eq(term))
                        .add(product_model::Column::ModelNumber.contains(term)),
                );
        }
        if let Some(status) = query.status_filter() {
            finder = finder.filter(inventory_item::Column::Status.eq(status));
        }

        let paginator = finder
            .find_also_related(ProductModel)
            .paginate(db, query.per_page());
        let total_items = paginator.num_items().await?;
        let rows = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        let data = rows
            .into_iter()
            .map(|(item, product_model)| ItemResponse {
                item,
                product_model,
            })
            .collect();

        Ok(PaginatedResponse::new(data, &query, total_items))
    }
}
