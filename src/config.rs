use std::env;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: String,
    pub sim_enabled: bool,
    pub sim_tick_interval: Duration,
    pub sim_speed_kmh: f64,
    pub retention_days: i64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let db_host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let db_port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
        let db_name = env::var("DB_DATABASE").unwrap_or_else(|_| "operations".to_string());
        let db_user = env::var("DB_USER").unwrap_or_else(|_| "operations".to_string());
        let db_pwd = env::var("DB_PWD").unwrap_or_else(|_| "operations".to_string());

        let database_url = format!(
            "postgres://{}:{}@{}:{}/{}",
            db_user, db_pwd, db_host, db_port, db_name
        );

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let sim_enabled = env::var("SIM_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);
        let sim_tick_secs: u64 = env::var("SIM_TICK_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let sim_speed_kmh = env::var("SIM_SPEED_KMH")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .unwrap_or(20.0);

        // 0 or negative disables the retention janitor.
        let retention_days = env::var("GPS_RETENTION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);

        Ok(Self {
            database_url,
            db_max_connections,
            log_level,
            sim_enabled,
            sim_tick_interval: Duration::from_secs(sim_tick_secs),
            sim_speed_kmh,
            retention_days,
        })
    }
}
