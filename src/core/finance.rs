//! Finance business logic - the manual side of the ledger.
//!
//! Manual entries come from the finance screen; the automatic income and
//! commission rows are inserted by the ticket lifecycle on delivery.
//! Commissions count as outflow in the summary, matching how the shop
//! reads its net profit.

use crate::{
    core::audit,
    entities::{AuditKind, FinTransaction, TransactionKind, fin_transaction, user},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Aggregated ledger totals for the finance screen and dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinanceSummary {
    /// Sum of all income rows
    pub total_income: f64,
    /// Sum of all expense and commission rows
    pub total_outflow: f64,
    /// `total_income - total_outflow`
    pub net_profit: f64,
}

/// Records a manual ledger entry and appends a `create` audit entry.
///
/// The amount must be finite and positive; the sign is carried by the
/// transaction kind, not the number.
pub async fn record_transaction(
    db: &DatabaseConnection,
    actor: &user::Model,
    kind: TransactionKind,
    amount: f64,
    description: String,
) -> Result<fin_transaction::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if description.trim().is_empty() {
        return Err(Error::Validation {
            message: "A transaction description is required".to_string(),
        });
    }

    let txn = db.begin().await?;

    let created = fin_transaction::ActiveModel {
        kind: Set(kind),
        amount: Set(amount),
        description: Set(description.trim().to_string()),
        date: Set(chrono::Utc::now()),
        related_ticket_id: Set(None),
        related_technician_id: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    audit::append(
        &txn,
        actor,
        "Transaction recorded",
        format!(
            "Recorded {:?} of {}: {}",
            created.kind, created.amount, created.description
        ),
        AuditKind::Create,
    )
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Retrieves the whole ledger, newest first.
pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<fin_transaction::Model>> {
    FinTransaction::find()
        .order_by_desc(fin_transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the ledger totals. Income counts `income` rows; outflow counts
/// `expense` and `commission` rows.
pub async fn finance_summary(db: &DatabaseConnection) -> Result<FinanceSummary> {
    let transactions = FinTransaction::find().all(db).await?;

    let mut total_income = 0.0;
    let mut total_outflow = 0.0;
    for transaction in &transactions {
        match transaction.kind {
            TransactionKind::Income => total_income += transaction.amount,
            TransactionKind::Expense | TransactionKind::Commission => {
                total_outflow += transaction.amount;
            }
        }
    }

    Ok(FinanceSummary {
        total_income,
        total_outflow,
        net_profit: total_income - total_outflow,
    })
}
