//! AuditLog entity - An append-only record of who did what.
//!
//! Entries are written only when a mutating operation completes
//! successfully; aborted operations leave no trace. The log is never
//! mutated or pruned by the application.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    /// A record was created
    #[sea_orm(string_value = "create")]
    Create,
    /// A record was modified
    #[sea_orm(string_value = "update")]
    Update,
    /// A record was removed
    #[sea_orm(string_value = "delete")]
    Delete,
    /// Anything else (logins, seeding, maintenance)
    #[sea_orm(string_value = "system")]
    System,
}

/// Audit log database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Acting user's id (not a foreign key: user deletion must not cascade)
    pub user_id: i64,
    /// Acting user's display name, denormalized for readability
    pub user_name: String,
    /// Short action label, e.g. "Ticket created"
    pub action: String,
    /// Free-text detail
    pub details: String,
    /// Category of the action
    pub kind: AuditKind,
    /// When the action completed
    pub timestamp: DateTimeUtc,
}

/// Defines relationships between AuditLog and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
