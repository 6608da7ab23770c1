//! Unified error type and `Result` alias for the crate.
//!
//! Validation and stock errors carry enough context to render a
//! user-facing message; infrastructure errors wrap their source via
//! `#[from]`. Every failure is terminal for the triggering action - the
//! system never retries.

use thiserror::Error;

/// All errors the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Insufficient stock for '{name}': requested {requested}, available {available}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("Ticket not found: {id}")]
    TicketNotFound { id: i64 },

    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    #[error("Inventory item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
