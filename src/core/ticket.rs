//! Ticket lifecycle business logic.
//!
//! Owns creation, editing, status transitions and deletion of repair
//! tickets, and keeps inventory quantities consistent with each ticket's
//! parts list. Reconciliation is an explicit diff: the per-item quantity
//! delta between the previous and the new parts list is validated against
//! current stock in one pass, then applied together with the ticket write
//! inside a single database transaction. An aborted save therefore leaves
//! every collection exactly as it was.
//!
//! Delivery side effects (one income row, one technician-commission row,
//! marking the ticket paid) fire at most once per ticket: the one-shot
//! `commission_calculated` flag is read and set inside the same
//! transaction that inserts the ledger rows.

use crate::{
    core::{audit, customer, inventory, users},
    entities::{
        AuditKind, Customer, Ticket, TicketStatus, TransactionKind, UsedPart, customer as customer_entity,
        fin_transaction, ticket, used_part, user,
    },
    errors::{Error, Result},
};
use sea_orm::{ActiveEnum, ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::BTreeMap;
use tracing::info;

/// How a draft refers to the ticket's customer.
#[derive(Debug, Clone)]
pub enum CustomerRef {
    /// An already registered customer
    Existing(i64),
    /// Register a new customer as part of the intake
    New { name: String, phone: String },
}

/// One requested part line on a draft.
#[derive(Debug, Clone, Copy)]
pub struct PartSelection {
    pub item_id: i64,
    pub quantity: i64,
}

/// Input for creating or editing a ticket.
///
/// `id: None` creates, `id: Some` edits in place. The customer reference is
/// required on create and ignored on edit (a ticket never changes hands).
#[derive(Debug, Clone)]
pub struct TicketDraft {
    pub id: Option<i64>,
    pub customer: Option<CustomerRef>,
    pub device_model: String,
    pub serial_number: String,
    pub issue_description: String,
    pub status: TicketStatus,
    pub technician_id: Option<i64>,
    pub cost: f64,
    pub parts: Vec<PartSelection>,
    pub ai_diagnosis: Option<String>,
}

impl TicketDraft {
    /// A blank intake draft, mirroring the reset state of the intake form.
    #[must_use]
    pub fn new_intake(customer: CustomerRef) -> Self {
        Self {
            id: None,
            customer: Some(customer),
            device_model: String::new(),
            serial_number: String::new(),
            issue_description: String::new(),
            status: TicketStatus::Received,
            technician_id: None,
            cost: 0.0,
            parts: Vec::new(),
            ai_diagnosis: None,
        }
    }
}

/// Creates or edits a ticket, reconciling inventory against the new parts
/// list. See the module docs for the transactional guarantees.
///
/// # Errors
/// `Error::Validation` for missing required fields,
/// `Error::InsufficientStock` when the diff would drive an item negative,
/// plus the usual not-found variants. Any error aborts the whole save.
pub async fn save_ticket(
    db: &DatabaseConnection,
    actor: &user::Model,
    draft: TicketDraft,
) -> Result<ticket::Model> {
    if draft.device_model.trim().is_empty() {
        return Err(Error::Validation {
            message: "A device model is required".to_string(),
        });
    }
    if !draft.cost.is_finite() || draft.cost < 0.0 {
        return Err(Error::InvalidAmount { amount: draft.cost });
    }

    // Fold duplicate selections of the same item into one line.
    let mut requested: BTreeMap<i64, i64> = BTreeMap::new();
    for part in &draft.parts {
        if part.quantity < 1 {
            return Err(Error::Validation {
                message: "Part quantities must be at least 1".to_string(),
            });
        }
        *requested.entry(part.item_id).or_insert(0) += part.quantity;
    }

    let txn = db.begin().await?;

    let existing = match draft.id {
        Some(id) => Some(
            Ticket::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(Error::TicketNotFound { id })?,
        ),
        None => None,
    };

    let old_parts = match &existing {
        Some(t) => parts_for_ticket(&txn, t.id).await?,
        None => Vec::new(),
    };

    // Resolve the customer. Edits keep the ticket's customer; creates either
    // look one up (and count the visit) or register a new one starting at
    // one visit.
    let (customer_id, customer_name) = match (&existing, draft.customer) {
        (Some(t), _) => {
            let name = customer::get_customer_by_id(&txn, t.customer_id)
                .await?
                .map_or_else(|| format!("customer #{}", t.customer_id), |c| c.name);
            (t.customer_id, name)
        }
        (None, Some(CustomerRef::Existing(id))) => {
            let existing_customer = customer::get_customer_by_id(&txn, id)
                .await?
                .ok_or(Error::CustomerNotFound { id })?;
            customer::record_visit_atomic(&txn, existing_customer.id).await?;
            (existing_customer.id, existing_customer.name)
        }
        (None, Some(CustomerRef::New { name, phone })) => {
            if name.trim().is_empty() || phone.trim().is_empty() {
                return Err(Error::Validation {
                    message: "A new customer needs a name and a phone number".to_string(),
                });
            }
            let created = customer_entity::ActiveModel {
                name: Set(name.trim().to_string()),
                phone: Set(phone.trim().to_string()),
                email: Set(None),
                notes: Set(String::new()),
                total_visits: Set(1),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            (created.id, created.name)
        }
        (None, None) => {
            return Err(Error::Validation {
                message: "A customer is required".to_string(),
            });
        }
    };

    // Quantities currently held by this ticket, per item.
    let mut held: BTreeMap<i64, i64> = BTreeMap::new();
    // Unit-price snapshots to preserve across the edit.
    let mut snapshots: BTreeMap<i64, f64> = BTreeMap::new();
    for part in &old_parts {
        *held.entry(part.item_id).or_insert(0) += part.quantity;
        snapshots.entry(part.item_id).or_insert(part.unit_price);
    }

    // Validate every delta before touching stock: a single shortfall must
    // abort with nothing applied.
    let mut items = BTreeMap::new();
    for (&item_id, &new_quantity) in &requested {
        let item = inventory::get_item_by_id(&txn, item_id)
            .await?
            .ok_or(Error::ItemNotFound { id: item_id })?;
        let delta = new_quantity - held.get(&item_id).copied().unwrap_or(0);
        if delta > item.quantity {
            return Err(Error::InsufficientStock {
                name: item.name,
                requested: delta,
                available: item.quantity,
            });
        }
        items.insert(item_id, item);
    }

    // Apply the diff: release items dropped from the list, then shift stock
    // by the delta for every remaining line.
    for (&item_id, &old_quantity) in &held {
        if !requested.contains_key(&item_id) {
            inventory::adjust_stock_atomic(&txn, item_id, old_quantity).await?;
        }
    }
    for (&item_id, &new_quantity) in &requested {
        let delta = new_quantity - held.get(&item_id).copied().unwrap_or(0);
        if delta != 0 {
            inventory::adjust_stock_atomic(&txn, item_id, -delta).await?;
        }
    }

    // Price snapshots: kept lines keep their original price, new lines
    // snapshot the item's current price.
    let mut parts_cost = 0.0;
    let mut new_rows = Vec::new();
    #[allow(clippy::cast_precision_loss)]
    for (&item_id, &quantity) in &requested {
        let unit_price = snapshots
            .get(&item_id)
            .copied()
            .unwrap_or_else(|| items[&item_id].price);
        parts_cost += unit_price * quantity as f64;
        new_rows.push((item_id, quantity, unit_price));
    }

    let now = chrono::Utc::now();
    let is_edit = existing.is_some();
    let saved = match existing {
        Some(t) => {
            let mut active: ticket::ActiveModel = t.into();
            active.device_model = Set(draft.device_model.trim().to_string());
            active.serial_number = Set(draft.serial_number);
            active.issue_description = Set(draft.issue_description);
            active.status = Set(draft.status);
            active.technician_id = Set(draft.technician_id);
            active.cost = Set(draft.cost);
            active.parts_cost = Set(parts_cost);
            if let Some(text) = draft.ai_diagnosis {
                active.ai_diagnosis = Set(Some(text));
            }
            active.updated_at = Set(now);
            active.update(&txn).await?
        }
        None => {
            ticket::ActiveModel {
                customer_id: Set(customer_id),
                device_model: Set(draft.device_model.trim().to_string()),
                serial_number: Set(draft.serial_number),
                issue_description: Set(draft.issue_description),
                status: Set(draft.status),
                technician_id: Set(draft.technician_id),
                cost: Set(draft.cost),
                parts_cost: Set(parts_cost),
                paid: Set(false),
                commission_calculated: Set(false),
                ai_diagnosis: Set(draft.ai_diagnosis),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    // Replace the parts list wholesale.
    UsedPart::delete_many()
        .filter(used_part::Column::TicketId.eq(saved.id))
        .exec(&txn)
        .await?;
    for (item_id, quantity, unit_price) in new_rows {
        used_part::ActiveModel {
            ticket_id: Set(saved.id),
            item_id: Set(item_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    if is_edit {
        audit::append(
            &txn,
            actor,
            "Ticket updated",
            format!("Updated ticket #{}", saved.id),
            AuditKind::Update,
        )
        .await?;
    } else {
        audit::append(
            &txn,
            actor,
            "Ticket created",
            format!("Received {} from {customer_name}", saved.device_model),
            AuditKind::Create,
        )
        .await?;
    }

    txn.commit().await?;
    Ok(saved)
}

/// Moves a ticket to any status. First entry into `delivered` with a
/// technician assigned and a positive cost emits the income and commission
/// ledger rows exactly once and marks the ticket paid.
pub async fn change_status(
    db: &DatabaseConnection,
    actor: &user::Model,
    ticket_id: i64,
    new_status: TicketStatus,
) -> Result<ticket::Model> {
    transition(db, actor, ticket_id, new_status, "Status changed").await
}

/// Convenience transition into the terminal `rejected` status. No inventory
/// or financial side effect beyond the status write and the audit entry.
pub async fn reject_ticket(
    db: &DatabaseConnection,
    actor: &user::Model,
    ticket_id: i64,
) -> Result<ticket::Model> {
    transition(db, actor, ticket_id, TicketStatus::Rejected, "Ticket rejected").await
}

async fn transition(
    db: &DatabaseConnection,
    actor: &user::Model,
    ticket_id: i64,
    new_status: TicketStatus,
    action: &str,
) -> Result<ticket::Model> {
    let txn = db.begin().await?;

    let existing = Ticket::find_by_id(ticket_id)
        .one(&txn)
        .await?
        .ok_or(Error::TicketNotFound { id: ticket_id })?;

    let emit_commission = new_status == TicketStatus::Delivered
        && !existing.commission_calculated
        && existing.cost > 0.0;
    let technician_id = existing.technician_id;
    let cost = existing.cost;

    let mut active: ticket::ActiveModel = existing.into();
    active.status = Set(new_status);
    active.updated_at = Set(chrono::Utc::now());

    if emit_commission {
        if let Some(tech_id) = technician_id {
            // A dangling technician reference (deleted user) skips the
            // emission entirely rather than failing the transition.
            if let Some(technician) = users::get_user_by_id(&txn, tech_id).await? {
                let rate = technician.commission_rate.unwrap_or(0.0);
                fin_transaction::ActiveModel {
                    kind: Set(TransactionKind::Income),
                    amount: Set(cost),
                    description: Set(format!("Ticket #{ticket_id}")),
                    date: Set(chrono::Utc::now()),
                    related_ticket_id: Set(Some(ticket_id)),
                    related_technician_id: Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                fin_transaction::ActiveModel {
                    kind: Set(TransactionKind::Commission),
                    amount: Set(cost * rate / 100.0),
                    description: Set(format!("Commission #{ticket_id}")),
                    date: Set(chrono::Utc::now()),
                    related_ticket_id: Set(Some(ticket_id)),
                    related_technician_id: Set(Some(tech_id)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                active.paid = Set(true);
                active.commission_calculated = Set(true);
                info!(ticket_id, rate, "delivery emitted income and commission");
            }
        }
    }

    let updated = active.update(&txn).await?;

    audit::append(
        &txn,
        actor,
        action,
        format!("Ticket #{ticket_id} -> {}", new_status.to_value()),
        AuditKind::Update,
    )
    .await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a ticket, restoring every attached part's quantity to stock.
/// Irreversible; the caller is expected to have confirmed with the user.
pub async fn delete_ticket(
    db: &DatabaseConnection,
    actor: &user::Model,
    ticket_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Ticket::find_by_id(ticket_id)
        .one(&txn)
        .await?
        .ok_or(Error::TicketNotFound { id: ticket_id })?;

    let parts = parts_for_ticket(&txn, ticket_id).await?;
    for part in &parts {
        inventory::adjust_stock_atomic(&txn, part.item_id, part.quantity).await?;
    }
    UsedPart::delete_many()
        .filter(used_part::Column::TicketId.eq(ticket_id))
        .exec(&txn)
        .await?;

    let customer_name = customer::get_customer_by_id(&txn, existing.customer_id)
        .await?
        .map_or_else(|| "unknown".to_string(), |c| c.name);
    let device_model = existing.device_model.clone();
    existing.delete(&txn).await?;

    audit::append(
        &txn,
        actor,
        "Ticket deleted",
        format!("Deleted ticket for {customer_name} (device: {device_model})"),
        AuditKind::Delete,
    )
    .await?;

    txn.commit().await?;
    Ok(())
}

/// Stores the AI helper's output verbatim on the ticket. The text is opaque
/// to every other part of the system.
pub async fn attach_diagnosis(
    db: &DatabaseConnection,
    ticket_id: i64,
    diagnosis: String,
) -> Result<ticket::Model> {
    let existing = Ticket::find_by_id(ticket_id)
        .one(db)
        .await?
        .ok_or(Error::TicketNotFound { id: ticket_id })?;

    let mut active: ticket::ActiveModel = existing.into();
    active.ai_diagnosis = Set(Some(diagnosis));
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Retrieves a ticket by id.
pub async fn get_ticket_by_id<C: ConnectionTrait>(
    db: &C,
    ticket_id: i64,
) -> Result<Option<ticket::Model>> {
    Ticket::find_by_id(ticket_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// The ticket's current parts list.
pub async fn parts_for_ticket<C: ConnectionTrait>(
    db: &C,
    ticket_id: i64,
) -> Result<Vec<used_part::Model>> {
    UsedPart::find()
        .filter(used_part::Column::TicketId.eq(ticket_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// All tickets newest first, each paired with its customer (which may be
/// gone - deletions do not cascade).
pub async fn list_tickets_with_customers(
    db: &DatabaseConnection,
) -> Result<Vec<(ticket::Model, Option<customer_entity::Model>)>> {
    Ticket::find()
        .find_also_related(Customer)
        .order_by_desc(ticket::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Case-insensitive filter over customer name and device model, matching
/// the search box on the tickets screen.
pub async fn search_tickets(
    db: &DatabaseConnection,
    term: &str,
) -> Result<Vec<(ticket::Model, Option<customer_entity::Model>)>> {
    let needle = term.to_lowercase();
    Ok(list_tickets_with_customers(db)
        .await?
        .into_iter()
        .filter(|(t, c)| {
            t.device_model.to_lowercase().contains(&needle)
                || c.as_ref()
                    .is_some_and(|c| c.name.to_lowercase().contains(&needle))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::finance;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_save_requires_device_model_and_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        let no_device = save_ticket(&db, &admin, draft.clone()).await;
        assert!(matches!(
            no_device.unwrap_err(),
            Error::Validation { message: _ }
        ));

        draft.device_model = "iPhone 13".to_string();
        draft.customer = None;
        let no_customer = save_ticket(&db, &admin, draft).await;
        assert!(matches!(
            no_customer.unwrap_err(),
            Error::Validation { message: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_intake_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let item = create_test_item(&db, "Battery", 10, 100.0).await?;

        // New customer with an empty phone: the save must leave no ticket,
        // no customer, no inventory change and no audit entry behind.
        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: String::new(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.parts = vec![PartSelection {
            item_id: item.id,
            quantity: 3,
        }];

        let result = save_ticket(&db, &admin, draft).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        assert!(list_tickets_with_customers(&db).await?.is_empty());
        assert!(crate::core::customer::list_customers(&db).await?.is_empty());
        let item = crate::core::inventory::get_item_by_id(&db, item.id)
            .await?
            .unwrap();
        assert_eq!(item.quantity, 10);
        assert!(audit::list_recent(&db, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_inventory_conservation_across_create_edit_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let battery = create_test_item(&db, "Battery", 10, 100.0).await?;

        // Create attaching 3 units: 10 -> 7
        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 3,
        }];
        let saved = save_ticket(&db, &admin, draft.clone()).await?;
        assert_eq!(stock_of(&db, battery.id).await?, 7);
        assert_eq!(saved.parts_cost, 300.0);

        // Edit to 5 units instead: 10 - 5 = 5, not 10 - 3 - 5
        draft.id = Some(saved.id);
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 5,
        }];
        let edited = save_ticket(&db, &admin, draft).await?;
        assert_eq!(stock_of(&db, battery.id).await?, 5);
        assert_eq!(edited.parts_cost, 500.0);

        // Delete restores the pre-creation quantity exactly
        delete_ticket(&db, &admin, edited.id).await?;
        assert_eq!(stock_of(&db, battery.id).await?, 10);
        assert!(parts_for_ticket(&db, edited.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_stock_shortfall_aborts_whole_save() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let battery = create_test_item(&db, "Battery", 10, 100.0).await?;
        let screen = create_test_item(&db, "Screen", 2, 4500.0).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.parts = vec![
            PartSelection {
                item_id: battery.id,
                quantity: 3,
            },
            PartSelection {
                item_id: screen.id,
                quantity: 5,
            },
        ];

        let result = save_ticket(&db, &admin, draft).await;
        match result.unwrap_err() {
            Error::InsufficientStock {
                name,
                requested,
                available,
            } => {
                assert_eq!(name, "Screen");
                assert_eq!(requested, 5);
                assert_eq!(available, 2);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Full abort: neither item moved, no ticket, no customer, no log
        assert_eq!(stock_of(&db, battery.id).await?, 10);
        assert_eq!(stock_of(&db, screen.id).await?, 2);
        assert!(list_tickets_with_customers(&db).await?.is_empty());
        assert!(crate::core::customer::list_customers(&db).await?.is_empty());
        assert!(audit::list_recent(&db, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_cannot_exceed_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let battery = create_test_item(&db, "Battery", 10, 100.0).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 3,
        }];
        let saved = save_ticket(&db, &admin, draft.clone()).await?;

        // 3 held + 7 in stock = 10 available to this ticket; 11 is too many
        draft.id = Some(saved.id);
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 11,
        }];
        let result = save_ticket(&db, &admin, draft).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock { .. }
        ));

        // The ticket still holds 3 and stock still shows 7
        assert_eq!(stock_of(&db, battery.id).await?, 7);
        let parts = parts_for_ticket(&db, saved.id).await?;
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].quantity, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_keeps_price_snapshot_for_kept_lines() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let battery = create_test_item(&db, "Battery", 10, 100.0).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 3,
        }];
        let saved = save_ticket(&db, &admin, draft.clone()).await?;

        // Price rises after the part was attached
        crate::core::inventory::update_item(
            &db,
            &admin,
            battery.id,
            crate::core::inventory::ItemInput {
                name: "Battery".to_string(),
                quantity: 7,
                price: 150.0,
                min_threshold: 0,
            },
        )
        .await?;

        draft.id = Some(saved.id);
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 5,
        }];
        let edited = save_ticket(&db, &admin, draft).await?;

        // The kept line still costs 100 a unit
        let parts = parts_for_ticket(&db, edited.id).await?;
        assert_eq!(parts[0].unit_price, 100.0);
        assert_eq!(edited.parts_cost, 500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_intake_bumps_existing_customer_visits() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let regular = create_test_customer(&db, "Ahmed", "0100").await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::Existing(regular.id));
        draft.device_model = "iPhone 13".to_string();
        save_ticket(&db, &admin, draft.clone()).await?;
        let ticket = save_ticket(&db, &admin, draft).await?;

        let reloaded = customer::get_customer_by_id(&db, regular.id)
            .await?
            .unwrap();
        assert_eq!(reloaded.total_visits, 2);

        // Editing the ticket must not bump the counter again
        let edit = TicketDraft {
            id: Some(ticket.id),
            customer: None,
            device_model: "iPhone 13".to_string(),
            serial_number: String::new(),
            issue_description: "screen flickers".to_string(),
            status: TicketStatus::InProgress,
            technician_id: None,
            cost: 500.0,
            parts: Vec::new(),
            ai_diagnosis: None,
        };
        save_ticket(&db, &admin, edit).await?;
        let reloaded = customer::get_customer_by_id(&db, regular.id)
            .await?
            .unwrap();
        assert_eq!(reloaded.total_visits, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_emits_income_and_commission_exactly_once() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let technician = create_test_technician(&db, 20.0).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.cost = 1000.0;
        draft.technician_id = Some(technician.id);
        let ticket = save_ticket(&db, &admin, draft).await?;
        assert!(!ticket.paid);

        let delivered = change_status(&db, &admin, ticket.id, TicketStatus::Delivered).await?;
        assert!(delivered.paid);
        assert!(delivered.commission_calculated);

        let transactions = finance::list_transactions(&db).await?;
        assert_eq!(transactions.len(), 2);
        let income = transactions
            .iter()
            .find(|t| t.kind == TransactionKind::Income)
            .unwrap();
        assert_eq!(income.amount, 1000.0);
        assert_eq!(income.related_ticket_id, Some(ticket.id));
        let commission = transactions
            .iter()
            .find(|t| t.kind == TransactionKind::Commission)
            .unwrap();
        assert_eq!(commission.amount, 200.0);
        assert_eq!(commission.related_technician_id, Some(technician.id));

        // Re-entering delivered, directly or via a detour, emits nothing
        change_status(&db, &admin, ticket.id, TicketStatus::Delivered).await?;
        change_status(&db, &admin, ticket.id, TicketStatus::Ready).await?;
        change_status(&db, &admin, ticket.id, TicketStatus::Delivered).await?;
        assert_eq!(finance::list_transactions(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_without_technician_or_cost_emits_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let technician = create_test_technician(&db, 20.0).await?;

        // No technician assigned
        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.cost = 500.0;
        let unassigned = save_ticket(&db, &admin, draft.clone()).await?;
        change_status(&db, &admin, unassigned.id, TicketStatus::Delivered).await?;
        assert!(finance::list_transactions(&db).await?.is_empty());

        // Zero cost
        draft.customer = Some(CustomerRef::New {
            name: "Sara".to_string(),
            phone: "0111".to_string(),
        });
        draft.cost = 0.0;
        draft.technician_id = Some(technician.id);
        let free_repair = save_ticket(&db, &admin, draft).await?;
        change_status(&db, &admin, free_repair.id, TicketStatus::Delivered).await?;
        assert!(finance::list_transactions(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_is_terminal_status_write_only() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;
        let battery = create_test_item(&db, "Battery", 10, 100.0).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        draft.cost = 800.0;
        draft.parts = vec![PartSelection {
            item_id: battery.id,
            quantity: 2,
        }];
        let ticket = save_ticket(&db, &admin, draft).await?;

        let rejected = reject_ticket(&db, &admin, ticket.id).await?;
        assert_eq!(rejected.status, TicketStatus::Rejected);

        // No financial rows, parts still held by the ticket
        assert!(finance::list_transactions(&db).await?.is_empty());
        assert_eq!(stock_of(&db, battery.id).await?, 8);

        let entries = audit::list_recent(&db, Some(1)).await?;
        assert_eq!(entries[0].action, "Ticket rejected");
        Ok(())
    }

    #[tokio::test]
    async fn test_every_lifecycle_step_appends_one_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        let ticket = save_ticket(&db, &admin, draft.clone()).await?;
        assert_eq!(audit::list_recent(&db, None).await?.len(), 1);

        draft.id = Some(ticket.id);
        save_ticket(&db, &admin, draft).await?;
        assert_eq!(audit::list_recent(&db, None).await?.len(), 2);

        change_status(&db, &admin, ticket.id, TicketStatus::Ready).await?;
        assert_eq!(audit::list_recent(&db, None).await?.len(), 3);

        delete_ticket(&db, &admin, ticket.id).await?;
        let entries = audit::list_recent(&db, None).await?;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].kind, AuditKind::Delete);
        Ok(())
    }

    #[tokio::test]
    async fn test_attach_diagnosis_is_opaque() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        let ticket = save_ticket(&db, &admin, draft).await?;

        let updated = attach_diagnosis(
            &db,
            ticket.id,
            "Likely battery wear; replacement recommended.".to_string(),
        )
        .await?;
        assert_eq!(
            updated.ai_diagnosis.as_deref(),
            Some("Likely battery wear; replacement recommended.")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_search_matches_customer_or_device() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = create_test_admin(&db).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Ahmed".to_string(),
            phone: "0100".to_string(),
        });
        draft.device_model = "iPhone 13".to_string();
        save_ticket(&db, &admin, draft).await?;

        let mut draft = TicketDraft::new_intake(CustomerRef::New {
            name: "Sara".to_string(),
            phone: "0111".to_string(),
        });
        draft.device_model = "Galaxy S22".to_string();
        save_ticket(&db, &admin, draft).await?;

        assert_eq!(search_tickets(&db, "galaxy").await?.len(), 1);
        assert_eq!(search_tickets(&db, "ahmed").await?.len(), 1);
        assert_eq!(search_tickets(&db, "nothing").await?.len(), 0);
        Ok(())
    }

    async fn stock_of(db: &DatabaseConnection, item_id: i64) -> Result<i64> {
        Ok(crate::core::inventory::get_item_by_id(db, item_id)
            .await?
            .unwrap()
            .quantity)
    }
}
