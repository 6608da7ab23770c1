//! Audit log business logic.
//!
//! Emits one immutable entry per successful mutating action. `append` is
//! generic over the connection so callers can pass their open transaction;
//! an aborted transaction then discards the entry along with everything
//! else, which keeps the "never logged on failure" rule for free.

use crate::{
    entities::{AuditKind, AuditLog, audit_log, user},
    errors::Result,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, QuerySelect, Set, prelude::*};

/// Appends one audit entry attributed to the acting user.
///
/// Call this as the last step of a successful mutation, on the same
/// connection or transaction the mutation ran on.
pub async fn append<C: ConnectionTrait>(
    db: &C,
    actor: &user::Model,
    action: &str,
    details: String,
    kind: AuditKind,
) -> Result<audit_log::Model> {
    let entry = audit_log::ActiveModel {
        user_id: Set(actor.id),
        user_name: Set(actor.name.clone()),
        action: Set(action.to_string()),
        details: Set(details),
        kind: Set(kind),
        timestamp: Set(chrono::Utc::now()),
        ..Default::default()
    };

    entry.insert(db).await.map_err(Into::into)
}

/// Returns the most recent audit entries, newest first.
pub async fn list_recent(
    db: &DatabaseConnection,
    limit: Option<u64>,
) -> Result<Vec<audit_log::Model>> {
    let mut query = AuditLog::find().order_by_desc(audit_log::Column::Id);
    if let Some(limit) = limit {
        query = query.limit(limit);
    }
    query.all(db).await.map_err(Into::into)
}
