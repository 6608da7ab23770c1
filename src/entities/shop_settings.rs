//! ShopSettings entity - Singleton application settings.
//!
//! Exactly one row (id = 1) exists after first run. It is loaded once at
//! session start and overwritten wholesale on save; there is no field-level
//! patching.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed primary key of the singleton settings row.
pub const SETTINGS_ROW_ID: i64 = 1;

/// Shop settings database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_settings")]
pub struct Model {
    /// Always `SETTINGS_ROW_ID`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Shop display name, printed on labels
    pub shop_name: String,
    /// Currency label appended to amounts
    pub currency: String,
    /// Tax rate percentage
    pub tax_rate: f64,
    /// Shop contact phone
    pub phone: String,
    /// Shop address
    pub address: String,
    /// Dark UI theme
    pub dark_mode: bool,
    /// Primary UI accent color (hex)
    pub primary_color: String,
    /// UI font size: "small", "medium" or "large"
    pub font_size: String,
    /// UI layout: "spacious" or "compact"
    pub layout_type: String,
    /// Visual style: "professional", "glass", "minimal" or "soft"
    pub visual_style: String,
    /// Print the ticket id on labels
    pub print_show_id: bool,
    /// Print the customer name on labels
    pub print_show_customer_name: bool,
    /// Print the device model on labels
    pub print_show_device_model: bool,
    /// Print the issue description on labels
    pub print_show_issue: bool,
    /// Print the agreed cost on labels
    pub print_show_cost: bool,
    /// Print the intake date on labels
    pub print_show_date: bool,
    /// Print the shop name header on labels
    pub print_show_shop_name: bool,
}

/// Defines relationships between ShopSettings and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
