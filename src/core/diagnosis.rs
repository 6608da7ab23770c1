//! AI diagnosis helper.
//!
//! A `DiagnosisProvider` turns a device model and fault description into a
//! free-text suggestion for the technician. The output is advisory only;
//! whatever text comes back is stored verbatim on the ticket and never
//! interpreted. The built-in provider needs no network or API key and gives
//! a generic checklist, so the feature degrades gracefully when no real
//! provider is configured.

use crate::entities::ticket;
use crate::errors::Result;
use sea_orm::DatabaseConnection;

/// Generic first-steps checklist used when no external provider is wired up.
pub const FALLBACK_DIAGNOSIS: &str = "Initial assessment: inspect the device for liquid or \
impact damage, verify the reported fault, and check power delivery before opening the case. \
Common causes for this class of issue are a worn battery, a damaged display assembly or a \
faulty charging port.";

/// Source of diagnosis suggestions.
#[allow(async_fn_in_trait)]
pub trait DiagnosisProvider {
    /// Produces a suggestion for the given device and complaint.
    async fn analyze(&self, device_model: &str, issue_description: &str) -> Result<String>;
}

/// Offline provider returning the canned checklist regardless of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackDiagnosis;

impl DiagnosisProvider for FallbackDiagnosis {
    async fn analyze(&self, _device_model: &str, _issue_description: &str) -> Result<String> {
        Ok(FALLBACK_DIAGNOSIS.to_string())
    }
}

/// Runs the provider against a ticket's intake data and stores the result
/// on the ticket.
pub async fn diagnose_ticket<P: DiagnosisProvider>(
    db: &DatabaseConnection,
    provider: &P,
    ticket_id: i64,
) -> Result<ticket::Model> {
    let existing = crate::core::ticket::get_ticket_by_id(db, ticket_id)
        .await?
        .ok_or(crate::errors::Error::TicketNotFound { id: ticket_id })?;
    let suggestion = provider
        .analyze(&existing.device_model, &existing.issue_description)
        .await?;
    crate::core::ticket::attach_diagnosis(db, ticket_id, suggestion).await
}
