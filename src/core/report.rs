//! Dashboard aggregates.
//!
//! Everything here is computed on demand from the live tables; nothing is
//! cached or denormalized. "Active" tickets are those still in the shop's
//! hands, i.e. any status other than `ready` or `delivered` (a rejected
//! device still awaits pickup and therefore counts as active).

use crate::{
    core::finance::{self, FinanceSummary},
    entities::{InventoryItemModel, Ticket, TicketStatus, ticket},
    errors::Result,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter};

/// Headline numbers for the dashboard screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// All tickets ever created
    pub total_tickets: u64,
    /// Tickets still in the workshop (not ready, not delivered)
    pub active_tickets: u64,
    /// Tickets finished and awaiting pickup
    pub ready_tickets: u64,
    /// Ticket count per workflow status, in enum order
    pub tickets_by_status: Vec<(TicketStatus, u64)>,
    /// Items at or below their restock threshold
    pub low_stock: Vec<InventoryItemModel>,
    /// Ledger totals
    pub finance: FinanceSummary,
}

/// Computes the dashboard numbers in one pass over the relevant tables.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary> {
    let mut tickets_by_status = Vec::new();
    let mut total_tickets = 0;
    for status in TicketStatus::iter() {
        let count = Ticket::find()
            .filter(ticket::Column::Status.eq(status))
            .count(db)
            .await?;
        total_tickets += count;
        tickets_by_status.push((status, count));
    }

    let by_status = |wanted: TicketStatus| {
        tickets_by_status
            .iter()
            .find(|(status, _)| *status == wanted)
            .map_or(0, |(_, count)| *count)
    };
    let ready_tickets = by_status(TicketStatus::Ready);
    let active_tickets = total_tickets - ready_tickets - by_status(TicketStatus::Delivered);

    Ok(DashboardSummary {
        total_tickets,
        active_tickets,
        ready_tickets,
        tickets_by_status,
        low_stock: crate::core::inventory::low_stock_items(db).await?,
        finance: finance::finance_summary(db).await?,
    })
}
