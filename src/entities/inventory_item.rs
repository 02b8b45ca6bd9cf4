use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One physical tracked unit, either stock for sale or a managed asset.
///
/// The status column is the heart of the lifecycle state machine: it must
/// stay consistent with at most one active linkage (`sale_id`,
/// `borrowing_id`, or an open assignment row). All writes that move an item
/// between statuses go through `services::transitions`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_type: ItemType,
    pub status: ItemStatus,
    #[sea_orm(unique, nullable)]
    pub serial_number: Option<String>,
    #[sea_orm(unique, nullable)]
    pub mac_address: Option<String>,
    /// Asset tag, only populated for `ItemType::Asset` rows.
    #[sea_orm(unique, nullable)]
    pub asset_code: Option<String>,
    pub product_model_id: i32,
    pub added_by_id: i32,
    #[sea_orm(nullable)]
    pub sale_id: Option<i32>,
    /// Retained after return for borrowing history; a later borrowing
    /// overwrites it.
    #[sea_orm(nullable)]
    pub borrowing_id: Option<i32>,
    #[sea_orm(nullable)]
    pub assigned_to_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_model::Entity",
        from = "Column::ProductModelId",
        to = "super::product_model::Column::Id"
    )]
    ProductModel,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AddedById",
        to = "super::user::Column::Id"
    )]
    AddedBy,
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::SaleId",
        to = "super::sale::Column::Id"
    )]
    Sale,
    #[sea_orm(
        belongs_to = "super::borrowing::Entity",
        from = "Column::BorrowingId",
        to = "super::borrowing::Column::Id"
    )]
    Borrowing,
}

impl Related<super::product_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductModel.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::borrowing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrowing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Whether a unit is sellable stock or an internally managed asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum ItemType {
    #[sea_orm(string_value = "SALE")]
    #[serde(rename = "SALE")]
    Sale,
    #[sea_orm(string_value = "ASSET")]
    #[serde(rename = "ASSET")]
    Asset,
}

/// Lifecycle status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ItemStatus {
    #[sea_orm(string_value = "IN_STOCK")]
    #[serde(rename = "IN_STOCK")]
    InStock,
    #[sea_orm(string_value = "SOLD")]
    #[serde(rename = "SOLD")]
    Sold,
    #[sea_orm(string_value = "BORROWED")]
    #[serde(rename = "BORROWED")]
    Borrowed,
    #[sea_orm(string_value = "IN_WAREHOUSE")]
    #[serde(rename = "IN_WAREHOUSE")]
    InWarehouse,
    #[sea_orm(string_value = "ASSIGNED")]
    #[serde(rename = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "DECOMMISSIONED")]
    #[serde(rename = "DECOMMISSIONED")]
    Decommissioned,
    #[sea_orm(string_value = "DEFECTIVE")]
    #[serde(rename = "DEFECTIVE")]
    Defective,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "IN_STOCK",
            ItemStatus::Sold => "SOLD",
            ItemStatus::Borrowed => "BORROWED",
            ItemStatus::InWarehouse => "IN_WAREHOUSE",
            ItemStatus::Assigned => "ASSIGNED",
            ItemStatus::Decommissioned => "DECOMMISSIONED",
            ItemStatus::Defective => "DEFECTIVE",
        }
    }
}
