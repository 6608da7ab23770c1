//! User entity - A staff account with a role and a permission list.
//!
//! Passwords are stored and compared in plaintext; this is a single-shop
//! system on a trusted machine with no hashing, lockout or session expiry.
//! Permissions are the set of views the user may open, persisted as a
//! comma-separated slug string with typed accessors on the model.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role, used to gate actions and derive default permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full access including user administration
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Day-to-day floor supervision
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Repairs devices, earns commission on delivery
    #[sea_orm(string_value = "technician")]
    Technician,
    /// Front-desk intake
    #[sea_orm(string_value = "receptionist")]
    Receptionist,
}

/// Identifier of an application view a user may be granted access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Dashboard,
    Tickets,
    Inventory,
    Finance,
    Crm,
    Users,
    Settings,
    Logs,
}

impl View {
    /// Stable slug used in the persisted permission string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Tickets => "tickets",
            Self::Inventory => "inventory",
            Self::Finance => "finance",
            Self::Crm => "crm",
            Self::Users => "users",
            Self::Settings => "settings",
            Self::Logs => "logs",
        }
    }

    /// Parses a persisted slug back into a view, ignoring unknown values.
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        match slug {
            "dashboard" => Some(Self::Dashboard),
            "tickets" => Some(Self::Tickets),
            "inventory" => Some(Self::Inventory),
            "finance" => Some(Self::Finance),
            "crm" => Some(Self::Crm),
            "users" => Some(Self::Users),
            "settings" => Some(Self::Settings),
            "logs" => Some(Self::Logs),
            _ => None,
        }
    }

    /// Joins a permission set into the persisted representation.
    #[must_use]
    pub fn join(views: &[Self]) -> String {
        views
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name shown in headers and audit entries
    pub name: String,
    /// Login name, unique across the shop
    #[sea_orm(unique)]
    pub username: String,
    /// Plaintext password (see module docs)
    pub password: String,
    /// Staff role
    pub role: UserRole,
    /// Commission percentage, meaningful only for technicians
    pub commission_rate: Option<f64>,
    /// Comma-separated view slugs this user may open
    pub permissions: String,
}

impl Model {
    /// The user's permission list as typed views, skipping unknown slugs.
    #[must_use]
    pub fn permitted_views(&self) -> Vec<View> {
        self.permissions
            .split(',')
            .filter_map(View::parse)
            .collect()
    }

    /// Whether this user may open the given view.
    #[must_use]
    pub fn can_access(&self, view: View) -> bool {
        self.permitted_views().contains(&view)
    }
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
