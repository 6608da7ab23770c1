//! Inventory business logic - spare-part stock management.
//!
//! Ticket saves and deletions move stock through `adjust_stock_atomic`,
//! which runs on the caller's connection so the ticket lifecycle can fold
//! it into its transaction. Direct adjustments from the inventory screen
//! clamp at zero instead of erroring; only ticket reconciliation treats a
//! shortfall as a hard failure.

use crate::{
    core::audit,
    entities::{AuditKind, InventoryItem, inventory_item, user},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for creating or editing an inventory item.
#[derive(Debug, Clone)]
pub struct ItemInput {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub min_threshold: i64,
}

fn validate(input: &ItemInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Item name is required".to_string(),
        });
    }
    if input.quantity < 0 || input.min_threshold < 0 {
        return Err(Error::Validation {
            message: "Quantities cannot be negative".to_string(),
        });
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(Error::InvalidAmount { amount: input.price });
    }
    Ok(())
}

/// Creates an inventory item and appends a `create` audit entry.
pub async fn create_item(
    db: &DatabaseConnection,
    actor: &user::Model,
    input: ItemInput,
) -> Result<inventory_item::Model> {
    validate(&input)?;

    let txn = db.begin().await?;

    let created = inventory_item::ActiveModel {
        name: Set(input.name.trim().to_string()),
        quantity: Set(input.quantity),
        price: Set(input.price),
        min_threshold: Set(input.min_threshold),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::append(
        &txn,
        actor,
        "Inventory item created",
        format!("Added '{}' x{} to stock", created.name, created.quantity),
        AuditKind::Create,
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Overwrites an item's fields and appends an `update` audit entry.
pub async fn update_item(
    db: &DatabaseConnection,
    actor: &user::Model,
    item_id: i64,
    input: ItemInput,
) -> Result<inventory_item::Model> {
    validate(&input)?;

    let txn = db.begin().await?;

    let existing = get_item_by_id(&txn, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let mut active: inventory_item::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.quantity = Set(input.quantity);
    active.price = Set(input.price);
    active.min_threshold = Set(input.min_threshold);
    let updated = active.update(&txn).await?;

    audit::append(
        &txn,
        actor,
        "Inventory item updated",
        format!("Edited '{}'", updated.name),
        AuditKind::Update,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes an item and appends a `delete` audit entry.
///
/// Used-part rows on existing tickets keep their snapshot data - no
/// cascade.
pub async fn delete_item(db: &DatabaseConnection, actor: &user::Model, item_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = get_item_by_id(&txn, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;
    let name = existing.name.clone();
    existing.delete(&txn).await?;

    audit::append(
        &txn,
        actor,
        "Inventory item deleted",
        format!("Removed '{name}' from stock"),
        AuditKind::Delete,
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Direct stock adjustment from the inventory screen, clamped at zero.
pub async fn adjust_quantity(
    db: &DatabaseConnection,
    item_id: i64,
    delta: i64,
) -> Result<inventory_item::Model> {
    let txn = db.begin().await?;

    let existing = get_item_by_id(&txn, item_id)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let clamped = (existing.quantity + delta).max(0);
    let mut active: inventory_item::ActiveModel = existing.into();
    active.quantity = Set(clamped);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Atomically shifts stock by `delta` (negative deducts). The item must
/// exist; the caller is responsible for validating that the result stays
/// non-negative before applying.
pub async fn adjust_stock_atomic<C: ConnectionTrait>(
    db: &C,
    item_id: i64,
    delta: i64,
) -> Result<()> {
    InventoryItem::update_many()
        .col_expr(
            inventory_item::Column::Quantity,
            Expr::col(inventory_item::Column::Quantity).add(delta),
        )
        .filter(inventory_item::Column::Id.eq(item_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Retrieves an item by id.
pub async fn get_item_by_id<C: ConnectionTrait>(
    db: &C,
    item_id: i64,
) -> Result<Option<inventory_item::Model>> {
    InventoryItem::find_by_id(item_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all items, ordered by name.
pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Items at or below their reorder threshold.
pub async fn low_stock_items(db: &DatabaseConnection) -> Result<Vec<inventory_item::Model>> {
    InventoryItem::find()
        .filter(
            Expr::col(inventory_item::Column::Quantity)
                .lte(Expr::col(inventory_item::Column::MinThreshold)),
        )
        .order_by_asc(inventory_item::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
