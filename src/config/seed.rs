//! Seed data loading from config.toml.
//!
//! A fresh installation has no users, so nobody could log in without seed
//! data. The seed config describes the initial staff accounts, a starter
//! inventory, a couple of customers and the default shop settings; it is
//! applied only to tables that are still empty, so re-running the binary
//! never duplicates rows.

use crate::core::users::default_permissions;
use crate::entities::{
    Customer, InventoryItem, User, UserRole, View, customer, inventory_item, user,
};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde::Deserialize;
use std::path::Path;

/// Default location of the seed configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level structure of config.toml.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Default shop settings written to the singleton row
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Initial staff accounts
    #[serde(default)]
    pub users: Vec<UserConfig>,
    /// Initial spare-part stock
    #[serde(default)]
    pub inventory: Vec<ItemConfig>,
    /// Initial customer records
    #[serde(default)]
    pub customers: Vec<CustomerConfig>,
}

/// Default shop settings section.
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub shop_name: String,
    pub currency: String,
    pub tax_rate: f64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// A single seed staff account.
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: UserRole,
    #[serde(default)]
    pub commission_rate: Option<f64>,
}

/// A single seed inventory item.
#[derive(Debug, Deserialize, Clone)]
pub struct ItemConfig {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub min_threshold: i64,
}

/// A single seed customer.
#[derive(Debug, Deserialize, Clone)]
pub struct CustomerConfig {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            shop_name: "Professional Repair Center".to_string(),
            currency: "EGP".to_string(),
            tax_rate: 14.0,
            phone: "01000000000".to_string(),
            address: "Cairo, Egypt".to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            settings: SettingsConfig::default(),
            users: vec![
                UserConfig {
                    name: "General Manager".to_string(),
                    username: "admin".to_string(),
                    password: "123".to_string(),
                    role: UserRole::Admin,
                    commission_rate: Some(0.0),
                },
                UserConfig {
                    name: "Floor Supervisor".to_string(),
                    username: "manager".to_string(),
                    password: "123".to_string(),
                    role: UserRole::Manager,
                    commission_rate: Some(0.0),
                },
                UserConfig {
                    name: "Technician Mohamed".to_string(),
                    username: "tech".to_string(),
                    password: "123".to_string(),
                    role: UserRole::Technician,
                    commission_rate: Some(20.0),
                },
            ],
            inventory: vec![
                ItemConfig {
                    name: "iPhone 13 Pro screen".to_string(),
                    quantity: 5,
                    price: 4500.0,
                    min_threshold: 2,
                },
                ItemConfig {
                    name: "Samsung S22 battery".to_string(),
                    quantity: 10,
                    price: 1200.0,
                    min_threshold: 3,
                },
            ],
            customers: vec![
                CustomerConfig {
                    name: "Ahmed Mohamed".to_string(),
                    phone: "01012345678".to_string(),
                    email: None,
                    notes: "Regular customer".to_string(),
                },
                CustomerConfig {
                    name: "Sara Khaled".to_string(),
                    phone: "01198765432".to_string(),
                    email: None,
                    notes: String::new(),
                },
            ],
        }
    }
}

/// Loads seed configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Applies seed data to every collection that is still empty.
///
/// Settings seeding is handled separately by `core::settings::get_settings`,
/// which creates the singleton row on first read.
pub async fn seed_initial_data(db: &DatabaseConnection, config: &SeedConfig) -> Result<()> {
    if User::find().count(db).await? == 0 {
        for seed_user in &config.users {
            let permissions: Vec<View> = default_permissions(seed_user.role);
            user::ActiveModel {
                name: Set(seed_user.name.clone()),
                username: Set(seed_user.username.clone()),
                password: Set(seed_user.password.clone()),
                role: Set(seed_user.role),
                commission_rate: Set(seed_user.commission_rate),
                permissions: Set(View::join(&permissions)),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!("Seeded {} staff accounts", config.users.len());
    }

    if InventoryItem::find().count(db).await? == 0 {
        for seed_item in &config.inventory {
            inventory_item::ActiveModel {
                name: Set(seed_item.name.clone()),
                quantity: Set(seed_item.quantity),
                price: Set(seed_item.price),
                min_threshold: Set(seed_item.min_threshold),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!("Seeded {} inventory items", config.inventory.len());
    }

    if Customer::find().count(db).await? == 0 {
        for seed_customer in &config.customers {
            customer::ActiveModel {
                name: Set(seed_customer.name.clone()),
                phone: Set(seed_customer.phone.clone()),
                email: Set(seed_customer.email.clone()),
                notes: Set(seed_customer.notes.clone()),
                total_visits: Set(0),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }
        tracing::info!("Seeded {} customers", config.customers.len());
    }

    Ok(())
}
