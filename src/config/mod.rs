//! Configuration management: database location and seed data.

/// Database connection and table creation
pub mod database;

/// Seed data loading from config.toml
pub mod seed;

use crate::errors::Result;

/// Everything `main` needs to bring the system up.
#[derive(Debug)]
pub struct AppConfig {
    /// SeaORM connection URL, `DATABASE_URL` or a local SQLite fallback
    pub database_url: String,
    /// Seed data applied to an empty database
    pub seed: seed::SeedConfig,
}

/// Loads the full application configuration.
///
/// The database URL comes from the `DATABASE_URL` environment variable with
/// a local SQLite file as fallback. Seed data comes from `./config.toml`;
/// a missing file falls back to the built-in defaults, a malformed one is
/// an error.
pub fn load_app_configuration() -> Result<AppConfig> {
    let database_url = database::get_database_url();

    let seed = if std::path::Path::new(seed::DEFAULT_CONFIG_PATH).exists() {
        seed::load_config(seed::DEFAULT_CONFIG_PATH)?
    } else {
        tracing::warn!(
            "{} not found, using built-in seed defaults",
            seed::DEFAULT_CONFIG_PATH
        );
        seed::SeedConfig::default()
    };

    Ok(AppConfig { database_url, seed })
}
