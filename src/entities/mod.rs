//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod audit_log;
pub mod customer;
pub mod fin_transaction;
pub mod inventory_item;
pub mod shop_settings;
pub mod ticket;
pub mod used_part;
pub mod user;

// Re-export specific types to avoid conflicts
pub use audit_log::{
    AuditKind, Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel,
};
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use fin_transaction::{
    Column as FinTransactionColumn, Entity as FinTransaction, Model as FinTransactionModel,
    TransactionKind,
};
pub use inventory_item::{
    Column as InventoryItemColumn, Entity as InventoryItem, Model as InventoryItemModel,
};
pub use shop_settings::{
    Column as ShopSettingsColumn, Entity as ShopSettings, Model as ShopSettingsModel,
    SETTINGS_ROW_ID,
};
pub use ticket::{Column as TicketColumn, Entity as Ticket, Model as TicketModel, TicketStatus};
pub use used_part::{Column as UsedPartColumn, Entity as UsedPart, Model as UsedPartModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole, View};
