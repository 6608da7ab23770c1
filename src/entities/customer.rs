//! Customer entity - A repair-shop customer record.
//!
//! `total_visits` counts tickets opened against the customer: a brand-new
//! customer created during ticket intake starts at 1, one created from the
//! CRM screen starts at 0 and is bumped on each later intake.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Phone number, required for contact on pickup
    pub phone: String,
    /// Optional email address
    pub email: Option<String>,
    /// Free-text notes kept by the staff
    pub notes: String,
    /// Number of tickets opened against this customer
    pub total_visits: i64,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Tickets opened for this customer
    #[sea_orm(has_many = "super::ticket::Entity")]
    Ticket,
}

impl Related<super::ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ticket.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
