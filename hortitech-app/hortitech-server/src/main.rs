use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use hortitech_api::{build_router, cors_layer, AppState, EventBus};
use hortitech_core::repositories::{GreenhouseRepository, ZoneRepository};
use hortitech_infrastructure::{create_pool, run_migrations, PgGreenhouseRepository, PgZoneRepository};
use hortitech_shared::{telemetry, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (.env, config files, environment)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file writer on exit
    let _log_guard = telemetry::init_telemetry(&config.logging)?;

    info!("{} starting ({})", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await.context("Failed to run migrations")?;
    }

    // Repositories
    let greenhouse_repo: Arc<dyn GreenhouseRepository> = Arc::new(PgGreenhouseRepository::new(pool.clone()));
    let zone_repo: Arc<dyn ZoneRepository> = Arc::new(PgZoneRepository::new(pool));

    // Real-time channel and state
    let event_bus = Arc::new(EventBus::new(config.realtime.channel_capacity));
    let state = AppState::new(greenhouse_repo, zone_repo, event_bus);

    let app = build_router(state, cors_layer(&config.cors.allowed_origins));

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
