//! Plain-text device label rendering.
//!
//! Labels are small tags stuck to a device at intake. Which lines appear is
//! controlled per field by the `print_show_*` settings toggles; the render
//! itself is a pure function so it is trivially testable.

use crate::entities::{shop_settings, ticket};

/// Renders the intake label for a ticket as one line per enabled field.
#[must_use]
pub fn render_label(
    ticket: &ticket::Model,
    customer_name: &str,
    settings: &shop_settings::Model,
) -> String {
    let mut lines = Vec::new();

    if settings.print_show_shop_name {
        lines.push(settings.shop_name.clone());
    }
    if settings.print_show_id {
        lines.push(format!("Ticket #{:06}", ticket.id));
    }
    if settings.print_show_customer_name {
        lines.push(format!("Customer: {customer_name}"));
    }
    if settings.print_show_device_model {
        lines.push(format!("Device: {}", ticket.device_model));
    }
    if settings.print_show_issue {
        lines.push(format!("Issue: {}", ticket.issue_description));
    }
    if settings.print_show_cost {
        lines.push(format!("Cost: {} {}", ticket.cost, settings.currency));
    }
    if settings.print_show_date {
        lines.push(format!(
            "Received: {}",
            ticket.created_at.format("%Y-%m-%d %H:%M")
        ));
    }

    lines.join("\n")
}
