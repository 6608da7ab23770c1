//! Ticket entity - Represents a repair job from intake to delivery.
//!
//! A ticket tracks a customer's device through the repair workflow. Attached
//! spare parts live in the `used_parts` table and are replaced wholesale on
//! each save. The `commission_calculated` flag is the one-shot guard that
//! keeps the delivery side effects (income + commission transactions) from
//! firing more than once.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow status of a repair ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Device received at the front desk
    #[sea_orm(string_value = "received")]
    Received,
    /// A technician has been assigned
    #[sea_orm(string_value = "assigned")]
    Assigned,
    /// Repair in progress
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    /// Blocked waiting for spare parts
    #[sea_orm(string_value = "waiting_parts")]
    WaitingParts,
    /// Repair finished, awaiting pickup
    #[sea_orm(string_value = "ready")]
    Ready,
    /// Handed back to the customer
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Repair declined, device returned as-is
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Ticket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    /// Unique identifier for the ticket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer the device belongs to
    pub customer_id: i64,
    /// Device make/model as written on intake
    pub device_model: String,
    /// Serial number or IMEI, may be empty
    pub serial_number: String,
    /// Free-text fault description from the customer
    pub issue_description: String,
    /// Current workflow status
    pub status: TicketStatus,
    /// Assigned technician, if any
    pub technician_id: Option<i64>,
    /// Agreed repair cost in currency units
    pub cost: f64,
    /// Sum of unit price x quantity over the attached parts
    pub parts_cost: f64,
    /// Whether the customer has paid (set automatically on delivery)
    pub paid: bool,
    /// One-shot guard: income/commission transactions already emitted
    pub commission_calculated: bool,
    /// Verbatim AI helper output, opaque to the rest of the system
    pub ai_diagnosis: Option<String>,
    /// When the ticket was created
    pub created_at: DateTimeUtc,
    /// When the ticket was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Ticket and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ticket belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// A ticket owns its attached parts
    #[sea_orm(has_many = "super::used_part::Entity")]
    UsedPart,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::used_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsedPart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
