//! Shop settings singleton.
//!
//! There is exactly one settings row (id 1). The first read creates it from
//! the seed defaults, so callers never see an empty table. Saves overwrite
//! the whole row; there is no field-level patching and no audit entry.

use crate::{
    config::seed::SettingsConfig,
    entities::{SETTINGS_ROW_ID, ShopSettings, shop_settings},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

/// Turns seed-file settings into a full singleton row with the default
/// appearance and label options.
fn row_from_seed(seed: &SettingsConfig) -> shop_settings::ActiveModel {
    shop_settings::ActiveModel {
        id: Set(SETTINGS_ROW_ID),
        shop_name: Set(seed.shop_name.clone()),
        currency: Set(seed.currency.clone()),
        tax_rate: Set(seed.tax_rate),
        phone: Set(seed.phone.clone()),
        address: Set(seed.address.clone()),
        dark_mode: Set(false),
        primary_color: Set("#3b82f6".to_string()),
        font_size: Set("medium".to_string()),
        layout_type: Set("spacious".to_string()),
        visual_style: Set("professional".to_string()),
        print_show_id: Set(true),
        print_show_customer_name: Set(true),
        print_show_device_model: Set(true),
        print_show_issue: Set(true),
        print_show_cost: Set(true),
        print_show_date: Set(true),
        print_show_shop_name: Set(true),
    }
}

/// Loads the settings row, creating it from `seed` on first read.
pub async fn get_settings(
    db: &DatabaseConnection,
    seed: &SettingsConfig,
) -> Result<shop_settings::Model> {
    if let Some(existing) = ShopSettings::find_by_id(SETTINGS_ROW_ID).one(db).await? {
        return Ok(existing);
    }
    row_from_seed(seed).insert(db).await.map_err(Into::into)
}

/// Overwrites the singleton row with `updated` wholesale. The id is forced
/// back to the singleton key regardless of what the caller passed.
pub async fn save_settings(
    db: &DatabaseConnection,
    updated: shop_settings::Model,
) -> Result<shop_settings::Model> {
    let mut active: shop_settings::ActiveModel = updated.into_active_model();
    active.id = Set(SETTINGS_ROW_ID);
    // into_active_model marks nothing dirty; force every column to write.
    active.reset_all().update(db).await.map_err(Into::into)
}
