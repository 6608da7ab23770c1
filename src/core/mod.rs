//! Core business logic - framework-agnostic operations over the domain
//! entities. Nothing in here knows about a UI; every screen behavior of the
//! application is expressed as an async function taking a database
//! connection and (for mutations) the acting user.

/// Append-only audit trail
pub mod audit;
/// Customer records and visit counting
pub mod customer;
/// AI diagnosis helper contract
pub mod diagnosis;
/// Financial ledger and summary
pub mod finance;
/// Spare-part stock management
pub mod inventory;
/// Printable intake label rendering
pub mod label;
/// Dashboard summary numbers
pub mod report;
/// Explicit per-login session context
pub mod session;
/// Singleton shop settings
pub mod settings;
/// Ticket lifecycle and inventory reconciliation
pub mod ticket;
/// Staff accounts and authentication
pub mod users;
