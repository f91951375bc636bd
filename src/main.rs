use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use fleet_telemetry::config::AppConfig;
use fleet_telemetry::path::{demo_routes, StaticCatalog};
use fleet_telemetry::sim::{GeofenceDetector, MotionSimulator, RetentionJanitor, SimulatorConfig};
use fleet_telemetry::stores::pg::{PgCameraStore, PgPointStore, PgPolygonStore, PgVehicleStore};
use fleet_telemetry::stores::{PointStore, VehicleStore};
use fleet_telemetry::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting fleet telemetry service...");

    // Init DB
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    db::migrations::run(&pool).await?;
    info!("Connected to database");

    let vehicles: Arc<dyn VehicleStore> = Arc::new(PgVehicleStore::new(pool.clone()));
    let points: Arc<dyn PointStore> = Arc::new(PgPointStore::new(pool.clone()));

    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();

    if config.sim_enabled {
        let vehicle = vehicles.get_or_create_test_vehicle().await?;
        let catalog = Arc::new(StaticCatalog::new(demo_routes()?)?);
        let detector = GeofenceDetector::new(
            Arc::new(PgPolygonStore::new(pool.clone())),
            Arc::new(PgCameraStore::new(pool.clone())),
        );
        let simulator = MotionSimulator::new(
            SimulatorConfig {
                speed_kmh: config.sim_speed_kmh,
                tick_interval: config.sim_tick_interval,
            },
            vehicle.id,
            catalog,
            detector,
            points.clone(),
        )?;
        tasks.push(tokio::spawn(simulator.run(cancel.child_token())));
    } else {
        info!("GPS simulator disabled");
    }

    let janitor = RetentionJanitor::new(points.clone(), config.retention_days);
    tasks.push(tokio::spawn(janitor.run(cancel.child_token())));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }

    Ok(())
}
