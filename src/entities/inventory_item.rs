//! InventoryItem entity - A spare part held in stock.
//!
//! Quantities are mutated by ticket part attachment/detachment/deletion and
//! by direct stock adjustments. An item is flagged low-stock when its
//! quantity falls to `min_threshold` or below.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Part name, e.g. "iPhone 13 Pro screen"
    pub name: String,
    /// Units on hand
    pub quantity: i64,
    /// Current unit price in currency units
    pub price: f64,
    /// Quantity at or below which the item needs reordering
    pub min_threshold: i64,
}

impl Model {
    /// Whether the on-hand quantity has reached the reorder threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_threshold
    }
}

/// Defines relationships between InventoryItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Line items on tickets that draw from this item
    #[sea_orm(has_many = "super::used_part::Entity")]
    UsedPart,
}

impl Related<super::used_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsedPart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
