//! Customer (CRM) business logic.
//!
//! Customers are created either from the CRM screen or implicitly during
//! ticket intake. The visit counter is owned by the ticket lifecycle and
//! bumped through `record_visit_atomic` inside the intake transaction.

use crate::{
    core::audit,
    entities::{AuditKind, Customer, customer, user},
    errors::{Error, Result},
};
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for creating or editing a customer record.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: String,
}

fn validate(input: &CustomerInput) -> Result<()> {
    if input.name.trim().is_empty() || input.phone.trim().is_empty() {
        return Err(Error::Validation {
            message: "Customer name and phone are required".to_string(),
        });
    }
    Ok(())
}

/// Creates a customer from the CRM screen and appends a `create` audit
/// entry. CRM-created customers start with zero visits; intake-created ones
/// are inserted by the ticket lifecycle instead and start at one.
pub async fn create_customer(
    db: &DatabaseConnection,
    actor: &user::Model,
    input: CustomerInput,
) -> Result<customer::Model> {
    validate(&input)?;

    let txn = db.begin().await?;

    let created = customer::ActiveModel {
        name: Set(input.name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        email: Set(input.email),
        notes: Set(input.notes),
        total_visits: Set(0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::append(
        &txn,
        actor,
        "Customer created",
        format!("Registered customer: {}", created.name),
        AuditKind::Create,
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Overwrites a customer's contact fields, keeping the visit counter, and
/// appends an `update` audit entry.
pub async fn update_customer(
    db: &DatabaseConnection,
    actor: &user::Model,
    customer_id: i64,
    input: CustomerInput,
) -> Result<customer::Model> {
    validate(&input)?;

    let txn = db.begin().await?;

    let existing = get_customer_by_id(&txn, customer_id)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    let mut active: customer::ActiveModel = existing.into();
    active.name = Set(input.name.trim().to_string());
    active.phone = Set(input.phone.trim().to_string());
    active.email = Set(input.email);
    active.notes = Set(input.notes);
    let updated = active.update(&txn).await?;

    audit::append(
        &txn,
        actor,
        "Customer updated",
        format!("Edited customer: {}", updated.name),
        AuditKind::Update,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a customer record and appends a `delete` audit entry.
///
/// Tickets referencing the customer are left untouched - no cascade.
pub async fn delete_customer(
    db: &DatabaseConnection,
    actor: &user::Model,
    customer_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let existing = get_customer_by_id(&txn, customer_id)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;
    let name = existing.name.clone();
    existing.delete(&txn).await?;

    audit::append(
        &txn,
        actor,
        "Customer deleted",
        format!("Removed customer file: {name}"),
        AuditKind::Delete,
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Retrieves a customer by id.
pub async fn get_customer_by_id<C: ConnectionTrait>(
    db: &C,
    customer_id: i64,
) -> Result<Option<customer::Model>> {
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all customers, ordered by name.
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Case-insensitive search across name and phone.
pub async fn search_customers(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<customer::Model>> {
    Customer::find()
        .filter(
            Condition::any()
                .add(customer::Column::Name.contains(term))
                .add(customer::Column::Phone.contains(term)),
        )
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Atomically bumps the visit counter. Runs on the caller's connection so
/// ticket intake can include it in its transaction.
pub async fn record_visit_atomic<C: ConnectionTrait>(db: &C, customer_id: i64) -> Result<()> {
    Customer::update_many()
        .col_expr(
            customer::Column::TotalVisits,
            Expr::col(customer::Column::TotalVisits).add(1),
        )
        .filter(customer::Column::Id.eq(customer_id))
        .exec(db)
        .await?;
    Ok(())
}
