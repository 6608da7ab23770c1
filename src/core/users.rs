//! Staff account business logic - user administration and authentication.
//!
//! Authentication is a plaintext username/password match against the user
//! table (see the `entities::user` module docs). The resolved user is
//! treated purely as an attribute set - role, permission list, commission
//! rate.

use crate::{
    core::audit,
    entities::{AuditKind, User, UserRole, View, user},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for creating a staff account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub commission_rate: Option<f64>,
    /// Explicit permission set; defaults to the role's set when `None`
    pub permissions: Option<Vec<View>>,
}

/// The default permission set granted when a role is selected.
#[must_use]
pub fn default_permissions(role: UserRole) -> Vec<View> {
    match role {
        UserRole::Admin => vec![
            View::Dashboard,
            View::Tickets,
            View::Inventory,
            View::Finance,
            View::Crm,
            View::Logs,
            View::Users,
            View::Settings,
        ],
        UserRole::Manager => vec![
            View::Dashboard,
            View::Tickets,
            View::Inventory,
            View::Finance,
            View::Crm,
        ],
        UserRole::Receptionist => vec![View::Tickets, View::Crm, View::Dashboard],
        UserRole::Technician => vec![View::Tickets, View::Inventory],
    }
}

/// Resolves a username/password pair to the full user record.
///
/// # Errors
/// Returns `Error::InvalidCredentials` when no user matches; the message
/// deliberately does not say which half was wrong.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Password.eq(password))
        .one(db)
        .await?
        .ok_or(Error::InvalidCredentials)
}

/// Creates a staff account and appends a `create` audit entry.
pub async fn create_user(
    db: &DatabaseConnection,
    actor: &user::Model,
    new_user: NewUser,
) -> Result<user::Model> {
    if new_user.name.trim().is_empty()
        || new_user.username.trim().is_empty()
        || new_user.password.is_empty()
    {
        return Err(Error::Validation {
            message: "Name, username and password are required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let username = new_user.username.trim().to_string();
    if User::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::Validation {
            message: format!("Username '{username}' is already taken"),
        });
    }

    let permissions = new_user
        .permissions
        .unwrap_or_else(|| default_permissions(new_user.role));

    let created = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        username: Set(username),
        password: Set(new_user.password),
        role: Set(new_user.role),
        commission_rate: Set(new_user.commission_rate),
        permissions: Set(View::join(&permissions)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::append(
        &txn,
        actor,
        "User created",
        format!("Account '{}' ({:?})", created.username, created.role),
        AuditKind::Create,
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Overwrites a staff account's editable fields and appends an `update`
/// audit entry. The username is immutable.
pub async fn update_user(
    db: &DatabaseConnection,
    actor: &user::Model,
    user_id: i64,
    name: String,
    password: String,
    role: UserRole,
    commission_rate: Option<f64>,
    permissions: Vec<View>,
) -> Result<user::Model> {
    if name.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation {
            message: "Name and password are required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing = get_user_by_id(&txn, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active: user::ActiveModel = existing.into();
    active.name = Set(name.trim().to_string());
    active.password = Set(password);
    active.role = Set(role);
    active.commission_rate = Set(commission_rate);
    active.permissions = Set(View::join(&permissions));
    let updated = active.update(&txn).await?;

    audit::append(
        &txn,
        actor,
        "User updated",
        format!("Account '{}' modified", updated.username),
        AuditKind::Update,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a staff account and appends a `delete` audit entry.
///
/// Tickets referencing the user keep their dangling technician id - there
/// is deliberately no cascade across collections. An actor may not delete
/// their own account.
pub async fn delete_user(db: &DatabaseConnection, actor: &user::Model, user_id: i64) -> Result<()> {
    if actor.id == user_id {
        return Err(Error::Validation {
            message: "You cannot delete your own account".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing = get_user_by_id(&txn, user_id)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;
    let username = existing.username.clone();
    existing.delete(&txn).await?;

    audit::append(
        &txn,
        actor,
        "User deleted",
        format!("Account '{username}' removed"),
        AuditKind::Delete,
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Retrieves a user by id.
pub async fn get_user_by_id<C: ConnectionTrait>(db: &C, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Retrieves all users, ordered by name.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all technicians, used to fill the assignment dropdown.
pub async fn list_technicians(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Role.eq(UserRole::Technician))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
