//! In-memory store fakes shared by the simulator and service tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::bail;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{GpsPoint, Vehicle};

use super::{CameraRef, CameraStore, PointStore, PolygonRef, PolygonStore, VehicleStore};

#[derive(Default)]
pub struct MemoryPointStore {
    points: Mutex<Vec<GpsPoint>>,
    fail_inserts: AtomicBool,
}

impl MemoryPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<GpsPoint> {
        self.points.lock().unwrap().clone()
    }

    pub fn push(&self, point: GpsPoint) {
        self.points.lock().unwrap().push(point);
    }

    pub fn len(&self) -> usize {
        self.points.lock().unwrap().len()
    }
}

#[async_trait]
impl PointStore for MemoryPointStore {
    async fn insert(&self, point: &GpsPoint) -> anyhow::Result<()> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            bail!("injected insert failure");
        }
        self.points.lock().unwrap().push(point.clone());
        Ok(())
    }

    async fn latest_for_vehicles(
        &self,
        vehicle_ids: &[Uuid],
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<Uuid, GpsPoint>> {
        let points = self.points.lock().unwrap();
        let mut latest: HashMap<Uuid, GpsPoint> = HashMap::new();
        for p in points.iter() {
            if !vehicle_ids.contains(&p.vehicle_id) || p.captured_at < cutoff {
                continue;
            }
            match latest.get(&p.vehicle_id) {
                Some(existing) if existing.captured_at >= p.captured_at => {}
                _ => {
                    latest.insert(p.vehicle_id, p.clone());
                }
            }
        }
        Ok(latest)
    }

    async fn track(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> anyhow::Result<Vec<GpsPoint>> {
        let mut out: Vec<GpsPoint> = self
            .points
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.vehicle_id == vehicle_id && p.captured_at >= from && p.captured_at <= to)
            .cloned()
            .collect();
        out.sort_by_key(|p| p.captured_at);
        Ok(out)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut points = self.points.lock().unwrap();
        let before = points.len();
        points.retain(|p| p.captured_at >= cutoff);
        Ok((before - points.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryPolygonStore {
    polygons: Mutex<Vec<PolygonRef>>,
    containing: Mutex<HashSet<Uuid>>,
}

impl MemoryPolygonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_polygon(&self, id: Uuid, name: &str) {
        self.polygons.lock().unwrap().push(PolygonRef {
            id,
            name: name.to_string(),
        });
    }

    /// Marks whether `polygon_id` currently contains the vehicle, whatever
    /// the coordinates; tests script transitions tick by tick.
    pub fn set_contains(&self, polygon_id: Uuid, inside: bool) {
        let mut containing = self.containing.lock().unwrap();
        if inside {
            containing.insert(polygon_id);
        } else {
            containing.remove(&polygon_id);
        }
    }
}

#[async_trait]
impl PolygonStore for MemoryPolygonStore {
    async fn list_active(&self) -> anyhow::Result<Vec<PolygonRef>> {
        Ok(self.polygons.lock().unwrap().clone())
    }

    async fn contains(&self, polygon_id: Uuid, _lat: f64, _lon: f64) -> anyhow::Result<bool> {
        Ok(self.containing.lock().unwrap().contains(&polygon_id))
    }
}

#[derive(Default)]
pub struct MemoryCameraStore {
    cameras: Mutex<HashMap<Uuid, Vec<CameraRef>>>,
}

impl MemoryCameraStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_camera(&self, polygon_id: Uuid, camera_id: Uuid, kind: &str, is_active: bool) {
        self.cameras
            .lock()
            .unwrap()
            .entry(polygon_id)
            .or_default()
            .push(CameraRef {
                id: camera_id,
                kind: kind.to_string(),
                is_active,
            });
    }
}

#[async_trait]
impl CameraStore for MemoryCameraStore {
    async fn list_by_polygon(&self, polygon_id: Uuid) -> anyhow::Result<Vec<CameraRef>> {
        Ok(self
            .cameras
            .lock()
            .unwrap()
            .get(&polygon_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub struct MemoryVehicleStore {
    vehicles: Mutex<Vec<Vehicle>>,
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, vehicle: Vehicle) {
        self.vehicles.lock().unwrap().push(vehicle);
    }

    pub fn vehicle(plate: &str, contractor_id: Option<Uuid>) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            plate_number: plate.to_string(),
            contractor_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn list(&self, contractor_id: Option<Uuid>) -> anyhow::Result<Vec<Vehicle>> {
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|v| contractor_id.is_none() || v.contractor_id == contractor_id)
            .cloned()
            .collect())
    }

    async fn get_or_create_test_vehicle(&self) -> anyhow::Result<Vehicle> {
        let mut vehicles = self.vehicles.lock().unwrap();
        if let Some(v) = vehicles.iter().find(|v| v.plate_number == "TEST-001") {
            return Ok(v.clone());
        }
        let vehicle = Self::vehicle("TEST-001", None);
        vehicles.push(vehicle.clone());
        Ok(vehicle)
    }
}
