//! FinTransaction entity - A row in the financial ledger.
//!
//! Rows are created manually from the finance screen (income/expense) or
//! automatically when a ticket is delivered (one income plus one technician
//! commission). Commission rows carry back-references to the originating
//! ticket and technician.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money in: repair revenue, sales, services
    #[sea_orm(string_value = "income")]
    Income,
    /// Money out: rent, utilities, salaries
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Technician commission realized on delivery
    #[sea_orm(string_value = "commission")]
    Commission,
}

/// Financial transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fin_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ledger category
    pub kind: TransactionKind,
    /// Amount in currency units, always positive
    pub amount: f64,
    /// Human-readable description
    pub description: String,
    /// When the transaction was recorded
    pub date: DateTimeUtc,
    /// Ticket that generated this row, if any
    pub related_ticket_id: Option<i64>,
    /// Technician a commission is owed to, if any
    pub related_technician_id: Option<i64>,
}

/// Defines relationships between FinTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
