//! Storage collaborators behind trait seams. The polygon and camera stores
//! front the external geometry service (PostGIS does the actual containment
//! math); the vehicle and point stores are this service's own tables.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{GpsPoint, Vehicle};

#[cfg(test)]
pub mod memory;
pub mod pg;

pub const CAMERA_KIND_LPR: &str = "LPR";

/// Active geofence polygon reference. Geometry never leaves the database.
#[derive(Debug, Clone, FromRow)]
pub struct PolygonRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct CameraRef {
    pub id: Uuid,
    pub kind: String,
    pub is_active: bool,
}

#[async_trait]
pub trait PolygonStore: Send + Sync {
    async fn list_active(&self) -> anyhow::Result<Vec<PolygonRef>>;
    async fn contains(&self, polygon_id: Uuid, lat: f64, lon: f64) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait CameraStore: Send + Sync {
    async fn list_by_polygon(&self, polygon_id: Uuid) -> anyhow::Result<Vec<CameraRef>>;
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Vehicle>>;
    /// All vehicles, or one contractor's fleet.
    async fn list(&self, contractor_id: Option<Uuid>) -> anyhow::Result<Vec<Vehicle>>;
    /// Bootstraps the fixed identity the simulator drives.
    async fn get_or_create_test_vehicle(&self) -> anyhow::Result<Vehicle>;
}

#[async_trait]
pub trait PointStore: Send + Sync {
    /// Appends one sample. No dedup, no upsert.
    async fn insert(&self, point: &GpsPoint) -> anyhow::Result<()>;
    /// Freshest point per vehicle with `captured_at >= cutoff`.
    async fn latest_for_vehicles(
        &self,
        vehicle_ids: &[Uuid],
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<Uuid, GpsPoint>>;
    /// All points for one vehicle in `[from, to]`, ascending by `captured_at`.
    async fn track(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<GpsPoint>>;
    /// Deletes points captured before the cutoff, returning the row count.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64>;
}
