//! Shared helpers for unit tests.
//!
//! Every test runs against its own in-memory SQLite database with the full
//! schema created, so tests are isolated and need no cleanup.

#![allow(clippy::unwrap_used)]

use crate::config::database::create_tables;
use crate::core::users::default_permissions;
use crate::entities::{UserRole, View, customer, inventory_item, user};
use crate::errors::Result;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

/// Fresh in-memory database with all tables created.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// An admin account with full permissions, password "123".
pub async fn create_test_admin(db: &DatabaseConnection) -> Result<user::Model> {
    let permissions = default_permissions(UserRole::Admin);
    user::ActiveModel {
        name: Set("Test Admin".to_string()),
        username: Set("admin".to_string()),
        password: Set("123".to_string()),
        role: Set(UserRole::Admin),
        commission_rate: Set(Some(0.0)),
        permissions: Set(View::join(&permissions)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A technician account with the given commission rate, password "123".
pub async fn create_test_technician(
    db: &DatabaseConnection,
    commission_rate: f64,
) -> Result<user::Model> {
    let permissions = default_permissions(UserRole::Technician);
    user::ActiveModel {
        name: Set("Test Technician".to_string()),
        username: Set("tech".to_string()),
        password: Set("123".to_string()),
        role: Set(UserRole::Technician),
        commission_rate: Set(Some(commission_rate)),
        permissions: Set(View::join(&permissions)),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// A customer with zero recorded visits.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
) -> Result<customer::Model> {
    customer::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(phone.to_string()),
        email: Set(None),
        notes: Set(String::new()),
        total_visits: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// An inventory item with a restock threshold of 2.
pub async fn create_test_item(
    db: &DatabaseConnection,
    name: &str,
    quantity: i64,
    price: f64,
) -> Result<inventory_item::Model> {
    inventory_item::ActiveModel {
        name: Set(name.to_string()),
        quantity: Set(quantity),
        price: Set(price),
        min_threshold: Set(2),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
