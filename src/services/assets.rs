use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::asset_assignment;
use crate::entities::inventory_item::{self, ItemStatus, ItemType};
use crate::entities::{product_model, AssetAssignment, InventoryItem, User};
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};
use crate::services::transitions::{self, LinkChange};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddAssetRequest {
    #[validate(length(min = 1, message = "Asset code is required"))]
    pub asset_code: String,
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
    pub product_model_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAssetRequest {
    pub user_id: i32,
}

/// Service for asset-type items: warehouse intake, assignment to
/// employees, return, and decommissioning. Assignment history lives in
/// `asset_assignments`; the open record is the row without a return
/// timestamp, and an asset never has more than one of those.
#[derive(Clone)]
pub struct AssetService {
    db: Arc<DbPool>,
}

impl AssetService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Registers a new asset in the warehouse.
    #[instrument(skip(self, request), fields(added_by_id))]
    pub async fn add_asset(
        &self,
        request: AddAssetRequest,
        added_by_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        request.validate()?;

        let item = inventory_item::ActiveModel {
            item_type: Set(ItemType::Asset),
            status: Set(ItemStatus::InWarehouse),
            asset_code: Set(Some(request.asset_code)),
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
        .map_err(|e| {
            ServiceError::classify_unique(e, &["asset_code", "serial_number", "mac_address"])
        })?;

        info!(item_id = item.id, "asset added");
        Ok(item)
    }

    /// Assigns a warehouse asset to a user. Preconditions are enforced
    /// inside the transaction: the item must be an IN_WAREHOUSE asset with
    /// no open assignment record.
    #[instrument(skip(self), fields(item_id, user_id, approved_by_id))]
    pub async fn assign_asset(
        &self,
        item_id: i32,
        user_id: i32,
        approved_by_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let item = find_asset(&txn, item_id).await?;
        if item.status != ItemStatus::InWarehouse {
            return Err(ServiceError::State(format!(
                "Asset {} cannot be assigned while {}",
                item_id,
                item.status.as_str()
            )));
        }

        let open = AssetAssignment::find()
            .filter(asset_assignment::Column::ItemId.eq(item_id))
            .filter(asset_assignment::Column::ReturnedAt.is_null())
            .count(&txn)
            .await?;
        if open > 0 {
            return Err(ServiceError::State(format!(
                "Asset {} already has an open assignment",
                item_id
            )));
        }

        User::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))?;

        asset_assignment::ActiveModel {
            item_id: Set(item_id),
            assignee_id: Set(user_id),
            approved_by_id: Set(approved_by_id),
            assigned_at: Set(Utc::now()),
            returned_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        transitions::move_items(
            &txn,
            &[item_id],
            ItemStatus::InWarehouse,
            ItemStatus::Assigned,
            LinkChange::SetAssignee(user_id),
        )
        .await?;

        let item = find_asset(&txn, item_id).await?;
        txn.commit().await?;

        info!(item_id, user_id, "asset assigned");
        Ok(item)
    }

    /// Returns an assigned asset to the warehouse, closing the open
    /// assignment record so it becomes history.
    #[instrument(skip(self), fields(item_id))]
    pub async fn return_asset(&self, item_id: i32) -> Result<inventory_item::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let item = find_asset(&txn, item_id).await?;
        if item.status != ItemStatus::Assigned {
            return Err(ServiceError::State(format!(
                "Asset {} is not assigned (currently {})",
                item_id,
                item.status.as_str()
            )));
        }

        close_open_assignment(&txn, item_id).await?;

        transitions::move_items(
            &txn,
            &[item_id],
            ItemStatus::Assigned,
            ItemStatus::InWarehouse,
            LinkChange::ClearAssignee,
        )
        .await?;

        let item = find_asset(&txn, item_id).await?;
        txn.commit().await?;

        info!(item_id, "asset returned to warehouse");
        Ok(item)
    }

    /// Decommissions an asset: closes any open assignment and moves the
    /// item into its terminal state.
    #[instrument(skip(self), fields(item_id))]
    pub async fn decommission_asset(
        &self,
        item_id: i32,
    ) -> Result<inventory_item::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let item = find_asset(&txn, item_id).await?;
        if !matches!(
            item.status,
            ItemStatus::InWarehouse | ItemStatus::Assigned | ItemStatus::Defective
        ) {
            return Err(ServiceError::State(format!(
                "Asset {} cannot be decommissioned while {}",
                item_id,
                item.status.as_str()
            )));
        }

        close_open_assignment(&txn, item_id).await?;

        transitions::move_items(
            &txn,
            &[item_id],
            item.status,
            ItemStatus::Decommissioned,
            LinkChange::ClearAssignee,
        )
        .await?;

        let item = find_asset(&txn, item_id).await?;
        txn.commit().await?;

        info!(item_id, "asset decommissioned");
        Ok(item)
    }

    /// Past and present assignment records for an asset, newest first.
    pub async fn assignment_history(
        &self,
        item_id: i32,
    ) -> Result<Vec<asset_assignment::Model>, ServiceError> {
        let db = &*self.db;
        find_asset(db, item_id).await?;

        let history = AssetAssignment::find()
            .filter(asset_assignment::Column::ItemId.eq(item_id))
            .order_by_desc(asset_assignment::Column::AssignedAt)
            .all(db)
            .await?;
        Ok(history)
    }

    /// Lists asset-type items with optional status filter and search over
    /// asset code, serial number, and model number.
    pub async fn list_assets(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<inventory_item::Model>, ServiceError> {
        let db = &*self.db;

        let mut finder = InventoryItem::find()
            .filter(inventory_item::Column::ItemType.eq(ItemType::Asset))
            .order_by_desc(inventory_item::Column::CreatedAt);

        if let Some(term) = query.search_term() {
            finder = finder
                .join(
                    JoinType::InnerJoin,
                    inventory_item::Relation::ProductModel.def(),
                )
                .filter(
                    Condition::any()
                        .add(inventory_item::Column::AssetCode.contains(term))
                        .add(inventory_item::Column::SerialNumber.contains(term))
                        .add(product_model::Column::ModelNumber.contains(term)),
                );
        }
        if let Some(status) = query.status_filter() {
            finder = finder.filter(inventory_item::Column::Status.eq(status));
        }

        let paginator = finder.paginate(db, query.per_page());
        let total_items = paginator.num_items().await?;
        let data = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        Ok(PaginatedResponse::new(data, &query, total_items))
    }
}

async fn find_asset<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
) -> Result<inventory_item::Model, ServiceError> {
    let item = InventoryItem::find_by_id(item_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Asset".to_string()))?;
    if item.item_type != ItemType::Asset {
        return Err(ServiceError::State(format!(
            "Item {} is not an asset",
            item_id
        )));
    }
    Ok(item)
}

async fn close_open_assignment<C: ConnectionTrait>(
    conn: &C,
    item_id: i32,
) -> Result<(), ServiceError> {
    AssetAssignment::update_many()
        .set(asset_assignment::ActiveModel {
            returned_at: Set(Some(Utc::now())),
            ..Default::default()
        })
        .filter(asset_assignment::Column::ItemId.eq(item_id))
        .filter(asset_assignment::Column::ReturnedAt.is_null())
        .exec(conn)
        .await?;
    Ok(())
}
