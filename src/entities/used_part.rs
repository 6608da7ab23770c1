//! UsedPart entity - A line item linking a ticket to an inventory item.
//!
//! Each row records the quantity consumed and a unit-price snapshot taken
//! when the part was first attached, so later price changes on the
//! inventory item do not rewrite history on old tickets.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Used-part database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "used_parts")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ticket this part is attached to
    pub ticket_id: i64,
    /// Inventory item the part was drawn from
    pub item_id: i64,
    /// Units consumed by the repair
    pub quantity: i64,
    /// Unit price at the time the part was attached
    pub unit_price: f64,
}

/// Defines relationships between UsedPart and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one ticket
    #[sea_orm(
        belongs_to = "super::ticket::Entity",
        from = "Column::TicketId",
        to = "super::ticket::Column::Id"
    )]
    Ticket,
    /// Each line item references one inventory item
    #[sea_orm(
        belongs_to = "super::inventory_item::Entity",
        from = "Column::ItemId",
        to = "super::inventory_item::Column::Id"
    )]
    InventoryItem,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl Related<super::inventory_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
