//! EventDesk normalization sweep
//!
//! Rewrites stored checklists, galleries and document sets into canonical
//! form. Run after deploys that change how these fields are written, or
//! once to clean up rows written by older clients.

use tracing::{debug, info, warn};

use EventDesk::{
    config::Settings,
    database::{DatabaseService, connection::{create_pool, run_migrations}},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;
    
    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;
    
    info!("Starting {}", EventDesk::info());
    debug!("Effective configuration:\n{}", settings.render_toml()?);
    
    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;
    run_migrations(&db_pool).await?;
    
    let database_service = DatabaseService::new(db_pool.clone());
    let services = ServiceFactory::new(database_service, &settings)?;
    
    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!("{}", issue);
        }
        anyhow::bail!("services are not healthy");
    }
    
    let report = services.normalizer.run().await?;
    info!(
        events_scanned = report.events_scanned,
        histories_scanned = report.histories_scanned,
        registrations_scanned = report.registrations_scanned,
        rewritten = report.total_rewritten(),
        held = report.total_held(),
        "Normalization complete"
    );
    if report.total_held() > 0 {
        warn!(held = report.total_held(), "Some rows hold unreadable elements and were left as stored");
    }
    
    db_pool.close().await;
    Ok(())
}
