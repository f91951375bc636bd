//! Postgres implementations of the store traits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{queries, DbPool};
use crate::models::{GpsPoint, Vehicle};

use super::{CameraRef, CameraStore, PointStore, PolygonRef, PolygonStore, VehicleStore};

const TEST_VEHICLE_PLATE: &str = "TEST-001";

pub struct PgPolygonStore {
    pool: DbPool,
}

impl PgPolygonStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolygonStore for PgPolygonStore {
    async fn list_active(&self) -> anyhow::Result<Vec<PolygonRef>> {
        let polygons = sqlx::query_as::<_, PolygonRef>(queries::SELECT_ACTIVE_POLYGONS)
            .fetch_all(&self.pool)
            .await?;
        Ok(polygons)
    }

    async fn contains(&self, polygon_id: Uuid, lat: f64, lon: f64) -> anyhow::Result<bool> {
        // ST_MakePoint takes (lon, lat); NULL means the polygon vanished
        // between the listing and this check.
        let contains = sqlx::query_scalar::<_, Option<bool>>(queries::POLYGON_CONTAINS_POINT)
            .bind(polygon_id)
            .bind(lon)
            .bind(lat)
            .fetch_one(&self.pool)
            .await?;
        Ok(contains.unwrap_or(false))
    }
}

pub struct PgCameraStore {
    pool: DbPool,
}

impl PgCameraStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CameraStore for PgCameraStore {
    async fn list_by_polygon(&self, polygon_id: Uuid) -> anyhow::Result<Vec<CameraRef>> {
        let cameras = sqlx::query_as::<_, CameraRef>(queries::SELECT_CAMERAS_BY_POLYGON)
            .bind(polygon_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(cameras)
    }
}

pub struct PgVehicleStore {
    pool: DbPool,
}

impl PgVehicleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(queries::SELECT_VEHICLE_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    async fn list(&self, contractor_id: Option<Uuid>) -> anyhow::Result<Vec<Vehicle>> {
        let vehicles = match contractor_id {
            Some(contractor_id) => {
                sqlx::query_as::<_, Vehicle>(queries::SELECT_VEHICLES_BY_CONTRACTOR)
                    .bind(contractor_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>(queries::SELECT_VEHICLES)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(vehicles)
    }

    async fn get_or_create_test_vehicle(&self) -> anyhow::Result<Vehicle> {
        if let Some(vehicle) = sqlx::query_as::<_, Vehicle>(queries::SELECT_VEHICLE_BY_PLATE)
            .bind(TEST_VEHICLE_PLATE)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(vehicle);
        }

        let id = Uuid::new_v4();
        sqlx::query(queries::INSERT_VEHICLE)
            .bind(id)
            .bind(TEST_VEHICLE_PLATE)
            .bind(true)
            .execute(&self.pool)
            .await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(queries::SELECT_VEHICLE_BY_ID)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(vehicle)
    }
}

pub struct PgPointStore {
    pool: DbPool,
}

impl PgPointStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointStore for PgPointStore {
    async fn insert(&self, point: &GpsPoint) -> anyhow::Result<()> {
        sqlx::query(queries::INSERT_GPS_POINT)
            .bind(point.id)
            .bind(point.gps_device_id)
            .bind(point.vehicle_id)
            .bind(point.captured_at)
            .bind(point.lat)
            .bind(point.lon)
            .bind(point.speed_kmh)
            .bind(point.heading_deg)
            .bind(point.raw_payload.as_deref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn latest_for_vehicles(
        &self,
        vehicle_ids: &[Uuid],
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<Uuid, GpsPoint>> {
        if vehicle_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let points = sqlx::query_as::<_, GpsPoint>(queries::SELECT_LATEST_POINTS)
            .bind(vehicle_ids.to_vec())
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        Ok(points.into_iter().map(|p| (p.vehicle_id, p)).collect())
    }

    async fn track(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<GpsPoint>> {
        let points = sqlx::query_as::<_, GpsPoint>(queries::SELECT_TRACK)
            .bind(vehicle_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(points)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = sqlx::query(queries::DELETE_POINTS_OLDER_THAN)
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
