use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A lending transaction: items leave stock without transfer of ownership.
///
/// The aggregate status is derived from the linked items: RETURNED exactly
/// when no linked item is still in BORROWED state. Once RETURNED it never
/// reopens.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrowings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub borrower_id: i32,
    pub approved_by_id: i32,
    pub status: BorrowingStatus,
    pub borrow_date: DateTime<Utc>,
    #[sea_orm(nullable)]
    pub due_date: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub return_date: Option<DateTime<Utc>>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::BorrowerId",
        to = "super::customer::Column::Id"
    )]
    Borrower,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApprovedById",
        to = "super::user::Column::Id"
    )]
    ApprovedBy,
    #[sea_orm(has_many = "super::inventory_item::Entity")]
    Items,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Borrower.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApprovedBy.def()
    }
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum BorrowingStatus {
    #[sea_orm(string_value = "BORROWED")]
    #[serde(rename = "BORROWED")]
    Borrowed,
    #[sea_orm(string_value = "RETURNED")]
    #[serde(rename = "RETURNED")]
    Returned,
}
