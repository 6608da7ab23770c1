//! Database configuration module.
//!
//! Handles the SQLite connection and table creation using SeaORM. Tables
//! are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the
//! Rust structs without hand-written SQL.

use crate::entities::{
    AuditLog, Customer, FinTransaction, InventoryItem, ShopSettings, Ticket, UsedPart, User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the environment or returns the default
/// local SQLite path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/repair_desk.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Statements are built with `if_not_exists` so calling this on an
/// already-initialized database is a no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Ticket),
        schema.create_table_from_entity(UsedPart),
        schema.create_table_from_entity(InventoryItem),
        schema.create_table_from_entity(Customer),
        schema.create_table_from_entity(FinTransaction),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(AuditLog),
        schema.create_table_from_entity(ShopSettings),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}

/// Connects to the database and ensures all tables exist.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{TicketModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables_in_memory() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Verify a couple of tables answer queries
        let tickets: Vec<TicketModel> = Ticket::find().limit(1).all(&db).await?;
        assert!(tickets.is_empty());
        let users: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        assert!(users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
