use dotenvy::dotenv;
use repair_desk::{
    config::{self, seed},
    core::{report, settings},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Load the main application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize the database. The default URL points into ./data, which
    //    must exist before SQLite can create the file.
    if app_config.database_url.starts_with("sqlite://data/") {
        std::fs::create_dir_all("data")?;
    }
    let db = config::database::init_db(&app_config.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed staff accounts, inventory and customers into empty tables
    seed::seed_initial_data(&db, &app_config.seed)
        .await
        .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;

    // 6. Ensure the settings singleton exists
    let shop = settings::get_settings(&db, &app_config.seed.settings).await?;
    info!(shop_name = %shop.shop_name, currency = %shop.currency, "Shop settings loaded.");

    // 7. Log a startup summary so an operator can sanity-check the state
    let summary = report::dashboard_summary(&db).await?;
    info!(
        total_tickets = summary.total_tickets,
        active_tickets = summary.active_tickets,
        ready_tickets = summary.ready_tickets,
        low_stock_items = summary.low_stock.len(),
        net_profit = summary.finance.net_profit,
        "Repair desk ready."
    );

    Ok(())
}
