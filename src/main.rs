//! TholviTrader service
//!
//! Entry point: loads configuration, connects to the database, runs
//! migrations, and keeps the reconciliation loop running. All user-facing
//! traffic goes through the hosted backend directly; this process only
//! owns the background repair work.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use tholvitrader::config::Settings;
use tholvitrader::database::{
    connection::{create_pool, run_migrations, DatabaseConfig},
    ContentRepository, NotificationRepository, PaymentRepository, UserRepository,
};
use tholvitrader::services::ServiceFactory;
use tholvitrader::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting {}...", tholvitrader::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = DatabaseConfig::from_settings(&settings.database);
    let pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    let users = Arc::new(UserRepository::new(pool.clone()));
    let payments = Arc::new(PaymentRepository::new(pool.clone()));
    let content = Arc::new(ContentRepository::new(pool.clone()));
    let notifications = Arc::new(NotificationRepository::new(pool));

    let services = ServiceFactory::new(&settings, users, payments, content, notifications)?;

    if !settings.reconciliation.enabled {
        info!("Reconciliation disabled, nothing to do");
        return Ok(());
    }

    info!(
        interval_seconds = settings.reconciliation.interval_seconds,
        "Starting reconciliation loop"
    );

    let mut ticker =
        tokio::time::interval(Duration::from_secs(settings.reconciliation.interval_seconds));
    loop {
        ticker.tick().await;

        match services.reconcile_service.run_once().await {
            Ok(report) => {
                if report.section_counts_repaired > 0 || report.tiers_repaired > 0 {
                    info!(
                        section_counts = report.section_counts_repaired,
                        tiers = report.tiers_repaired,
                        "Reconciliation repaired drift"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Reconciliation pass failed");
            }
        }
    }
}
