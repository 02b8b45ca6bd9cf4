//! The single state-transition primitive behind every lifecycle operation.
//!
//! Sale, borrowing, and asset-assignment services all follow the same
//! pattern: claim a set of items in a required source status, mutate their
//! status and linkage columns, and verify the row count — all inside the
//! caller's transaction. Centralizing that here keeps the near-duplicate
//! orchestration scripts from drifting apart.
//!
//! Every function takes a `ConnectionTrait` so it composes with an open
//! `DatabaseTransaction`; the status filter is always repeated in the
//! UPDATE itself, so availability is re-checked by the store at write time
//! rather than only at the preceding read.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use tracing::debug;

use crate::entities::inventory_item::{self, ItemStatus};
use crate::entities::InventoryItem;
use crate::errors::ServiceError;

/// Linkage column adjustment applied together with a status change. The
/// item-status invariant (at most one active linkage) holds because every
/// transition pairs the status write with exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    SetSale(i32),
    ClearSale,
    SetBorrowing(i32),
    /// Returned borrowed items keep their `borrowing_id` for history.
    KeepBorrowing,
    SetAssignee(i32),
    ClearAssignee,
    None,
}

/// Static transition-rule table. Operations outside this table are
/// programming errors, not user errors.
pub fn transition_allowed(from: ItemStatus, to: ItemStatus) -> bool {
    use ItemStatus::*;
    matches!(
        (from, to),
        // sale / borrowing lifecycle (SALE-type items)
        (InStock, Sold)
            | (Sold, InStock)
            | (InStock, Borrowed)
            | (Borrowed, InStock)
            // asset lifecycle (ASSET-type items)
            | (InWarehouse, Assigned)
            | (Assigned, InWarehouse)
            | (InWarehouse, Decommissioned)
            | (Assigned, Decommissioned)
            | (Defective, Decommissioned)
            // defect marking and repair, from either idle pool
            | (InStock, Defective)
            | (InWarehouse, Defective)
            | (Defective, InStock)
            | (Defective, InWarehouse)
    )
}

/// Loads the requested items, requiring every one of them to currently be
/// in `required` status. A count mismatch means at least one item is
/// missing or already claimed by another transaction; the error names the
/// offending ids so the caller can roll back with a useful message.
pub async fn claim_items<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
    required: ItemStatus,
) -> Result<Vec<inventory_item::Model>, ServiceError> {
    if ids.is_empty() {
        return Err(ServiceError::Validation(
            "At least one item id is required".to_string(),
        ));
    }

    let items = InventoryItem::find()
        .filter(inventory_item::Column::Id.is_in(ids.to_vec()))
        .filter(inventory_item::Column::Status.eq(required))
        .all(conn)
        .await?;

    if items.len() != ids.len() {
        let found: Vec<i32> = items.iter().map(|i| i.id).collect();
        let missing: Vec<String> = ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(ServiceError::State(format!(
            "One or more items are not available (expected {}): {}",
            required.as_str(),
            missing.join(", ")
        )));
    }

    Ok(items)
}

/// Moves all of `ids` from `from` to `to`, applying the linkage change.
/// The UPDATE is filtered on the source status, so a row claimed by a
/// concurrent transaction no longer matches; any shortfall in the affected
/// row count aborts the caller's transaction.
pub async fn move_items<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
    from: ItemStatus,
    to: ItemStatus,
    link: LinkChange,
) -> Result<(), ServiceError> {
    if !transition_allowed(from, to) {
        return Err(ServiceError::Internal(format!(
            "illegal item transition {} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }

    let result = InventoryItem::update_many()
        .set(link_model(to, link))
        .filter(inventory_item::Column::Id.is_in(ids.to_vec()))
        .filter(inventory_item::Column::Status.eq(from))
        .exec(conn)
        .await?;

    debug!(
        from = from.as_str(),
        to = to.as_str(),
        requested = ids.len(),
        updated = result.rows_affected,
        "item transition applied"
    );

    if result.rows_affected != ids.len() as u64 {
        return Err(ServiceError::State(format!(
            "One or more items could not be moved to {} status",
            to.as_str()
        )));
    }

    Ok(())
}

/// Moves every item matching `scope` (and currently in `from` status) to
/// `to`, returning how many rows moved. Unlike [`move_items`] a shortfall
/// is not an error; this backs reverts (all items of a sale) and partial
/// returns (the returned subset of a borrowing), where "whatever still
/// matches" is the correct contract.
pub async fn sweep_items<C: ConnectionTrait>(
    conn: &C,
    scope: Condition,
    from: ItemStatus,
    to: ItemStatus,
    link: LinkChange,
) -> Result<u64, ServiceError> {
    if !transition_allowed(from, to) {
        return Err(ServiceError::Internal(format!(
            "illegal item transition {} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }

    let result = InventoryItem::update_many()
        .set(link_model(to, link))
        .filter(scope)
        .filter(inventory_item::Column::Status.eq(from))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Counts items in `status` matching `scope`; used by closure predicates
/// such as "does this borrowing still have outstanding items".
pub async fn count_items_in_status<C: ConnectionTrait>(
    conn: &C,
    scope: Condition,
    status: ItemStatus,
) -> Result<u64, ServiceError> {
    let count = InventoryItem::find()
        .filter(scope)
        .filter(inventory_item::Column::Status.eq(status))
        .count(conn)
        .await?;
    Ok(count)
}

fn link_model(to: ItemStatus, link: LinkChange) -> inventory_item::ActiveModel {
    let mut model = inventory_item::ActiveModel {
        status: Set(to),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    match link {
        LinkChange::SetSale(id) => model.sale_id = Set(Some(id)),
        LinkChange::ClearSale => model.sale_id = Set(None),
        LinkChange::SetBorrowing(id) => model.borrowing_id = Set(Some(id)),
        LinkChange::KeepBorrowing => {}
        LinkChange::SetAssignee(id) => model.assigned_to_id = Set(Some(id)),
        LinkChange::ClearAssignee => model.assigned_to_id = Set(None),
        LinkChange::None => {}
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn sale_and_borrowing_transitions_are_reversible() {
        assert!(transition_allowed(ItemStatus::InStock, ItemStatus::Sold));
        assert!(transition_allowed(ItemStatus::Sold, ItemStatus::InStock));
        assert!(transition_allowed(ItemStatus::InStock, ItemStatus::Borrowed));
        assert!(transition_allowed(ItemStatus::Borrowed, ItemStatus::InStock));
    }

    #[test]
    fn decommissioned_is_terminal() {
        use ItemStatus::*;
        for to in [
            InStock,
            Sold,
            Borrowed,
            InWarehouse,
            Assigned,
            Defective,
        ] {
            assert!(
                !transition_allowed(Decommissioned, to),
                "DECOMMISSIONED must not transition to {}",
                to.as_str()
            );
        }
    }

    #[test]
    fn sold_items_only_return_to_stock() {
        use ItemStatus::*;
        for to in [Borrowed, InWarehouse, Assigned, Decommissioned, Defective] {
            assert!(!transition_allowed(Sold, to));
        }
        assert!(transition_allowed(Sold, InStock));
    }

    #[test]
    fn assets_move_between_warehouse_assignment_and_decommission() {
        use ItemStatus::*;
        assert!(transition_allowed(InWarehouse, Assigned));
        assert!(transition_allowed(Assigned, InWarehouse));
        assert!(transition_allowed(Assigned, Decommissioned));
        assert!(transition_allowed(InWarehouse, Decommissioned));
        assert!(!transition_allowed(InWarehouse, Sold));
        assert!(!transition_allowed(Assigned, Borrowed));
    }

    #[test]
    fn keep_borrowing_leaves_link_untouched() {
        let model = link_model(ItemStatus::InStock, LinkChange::KeepBorrowing);
        assert_eq!(model.borrowing_id, ActiveValue::NotSet);
        assert_eq!(model.status, ActiveValue::Set(ItemStatus::InStock));
    }

    #[test]
    fn clear_sale_nulls_the_link() {
        let model = link_model(ItemStatus::InStock, LinkChange::ClearSale);
        assert_eq!(model.sale_id, ActiveValue::Set(None));
    }
}
