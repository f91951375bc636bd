//! Schema for the tables this service owns. Polygons and cameras belong to
//! the geometry CRUD service; only their read side is consumed here.

use anyhow::Context;

use super::DbPool;

const MIGRATION_STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS vehicles (
        id UUID PRIMARY KEY,
        plate_number TEXT NOT NULL UNIQUE,
        contractor_id UUID,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );"#,
    r#"CREATE TABLE IF NOT EXISTS gps_points (
        id UUID PRIMARY KEY,
        gps_device_id UUID,
        vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
        captured_at TIMESTAMPTZ NOT NULL,
        lat DOUBLE PRECISION NOT NULL,
        lon DOUBLE PRECISION NOT NULL,
        speed_kmh DOUBLE PRECISION NOT NULL,
        heading_deg DOUBLE PRECISION NOT NULL,
        raw_payload TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    );"#,
    r#"CREATE INDEX IF NOT EXISTS idx_gps_points_vehicle_captured
        ON gps_points (vehicle_id, captured_at DESC);"#,
    r#"CREATE INDEX IF NOT EXISTS idx_gps_points_captured_at
        ON gps_points (captured_at);"#,
];

pub async fn run(pool: &DbPool) -> anyhow::Result<()> {
    for (i, stmt) in MIGRATION_STATEMENTS.iter().enumerate() {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .with_context(|| format!("migration {} failed", i + 1))?;
    }
    Ok(())
}
