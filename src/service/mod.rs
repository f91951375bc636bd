//! Read side of the telemetry store: live fleet status, historical tracks,
//! and administrative point deletion. Authorization is decided upstream;
//! callers hand these methods an already-resolved visibility scope.

pub mod error;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{GpsPoint, VehicleStatus};
use crate::stores::{PointStore, VehicleStore};

pub use error::ServiceError;

/// Freshest sample age still considered "live".
const FRESHNESS_WINDOW_SECS: i64 = 5 * 60;
const IN_TRIP_MAX_AGE_SECS: i64 = 2 * 60;

/// What the caller is allowed to see, as resolved by the auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The full fleet.
    Fleet,
    /// One organization's vehicles.
    Organization(Uuid),
    /// Driver role: no fleet visibility in the current design.
    Driver,
}

#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub visibility: Visibility,
    /// Required for destructive administrative operations.
    pub admin: bool,
}

impl Scope {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            admin: false,
        }
    }

    pub fn admin(visibility: Visibility) -> Self {
        Self {
            visibility,
            admin: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LiveQuery {
    pub bbox: Option<BoundingBox>,
    /// Narrows a fleet-wide view to one organization; ignored for callers
    /// already scoped to an organization.
    pub contractor_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct LiveVehicle {
    pub vehicle_id: Uuid,
    pub plate_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_position: Option<LastPosition>,
    pub status: VehicleStatus,
}

#[derive(Debug, Serialize)]
pub struct LastPosition {
    pub lat: f64,
    pub lon: f64,
    pub captured_at: String,
    pub speed_kmh: f64,
    pub heading_deg: f64,
    pub is_simulated: bool,
}

#[derive(Debug, Serialize)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    pub captured_at: String,
    pub speed_kmh: f64,
    pub heading_deg: f64,
}

/// Inclusive time range for track queries.
#[derive(Debug, Clone, Copy)]
pub struct TrackRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TrackRange {
    /// Default when the caller supplies no range.
    pub fn last_hour() -> Self {
        let now = Utc::now();
        Self {
            from: now - Duration::hours(1),
            to: now,
        }
    }
}

/// Administrative deletion cutoff: an absolute timestamp or a day count.
#[derive(Debug, Clone, Copy)]
pub enum DeleteCutoff {
    Timestamp(DateTime<Utc>),
    Days(i64),
}

#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub deleted: u64,
    pub cutoff: DateTime<Utc>,
}

fn classify_status(age: Duration) -> VehicleStatus {
    if age < Duration::seconds(IN_TRIP_MAX_AGE_SECS) {
        VehicleStatus::InTrip
    } else if age < Duration::seconds(FRESHNESS_WINDOW_SECS) {
        VehicleStatus::Idle
    } else {
        // Normally unreachable behind the fetch window; kept for samples
        // that slip through a looser bound.
        VehicleStatus::Offline
    }
}

fn last_position(point: &GpsPoint) -> LastPosition {
    LastPosition {
        lat: point.lat,
        lon: point.lon,
        captured_at: point.captured_at.to_rfc3339(),
        speed_kmh: point.speed_kmh,
        heading_deg: point.heading_deg,
        is_simulated: point.is_simulated(),
    }
}

pub struct MonitoringService {
    vehicles: Arc<dyn VehicleStore>,
    points: Arc<dyn PointStore>,
}

impl MonitoringService {
    pub fn new(vehicles: Arc<dyn VehicleStore>, points: Arc<dyn PointStore>) -> Self {
        Self { vehicles, points }
    }

    /// Live view of every vehicle the scope can see: freshest sample within
    /// the 5-minute window plus a status derived from its age.
    pub async fn vehicles_live(
        &self,
        scope: Scope,
        query: LiveQuery,
    ) -> Result<Vec<LiveVehicle>, ServiceError> {
        let vehicles = match scope.visibility {
            Visibility::Fleet => self.vehicles.list(query.contractor_id).await?,
            Visibility::Organization(org) => self.vehicles.list(Some(org)).await?,
            Visibility::Driver => return Ok(Vec::new()),
        };
        if vehicles.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = vehicles.iter().map(|v| v.id).collect();
        let now = Utc::now();
        let cutoff = now - Duration::seconds(FRESHNESS_WINDOW_SECS);
        let latest = self.points.latest_for_vehicles(&ids, cutoff).await?;

        let mut result = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let point = latest.get(&vehicle.id);

            if let Some(bbox) = &query.bbox {
                // A bbox filter only matches vehicles with a fresh position.
                match point {
                    Some(p) if bbox.contains(p.lat, p.lon) => {}
                    _ => continue,
                }
            }

            let status = match point {
                Some(p) => classify_status(now - p.captured_at),
                None => VehicleStatus::Offline,
            };

            result.push(LiveVehicle {
                vehicle_id: vehicle.id,
                plate_number: vehicle.plate_number,
                contractor_id: vehicle.contractor_id,
                last_position: point.map(last_position),
                status,
            });
        }
        Ok(result)
    }

    /// Chronological track for one vehicle over an inclusive time range.
    /// An empty range yields an empty track, never an error.
    pub async fn vehicle_track(
        &self,
        scope: Scope,
        vehicle_id: Uuid,
        range: TrackRange,
    ) -> Result<Vec<TrackPoint>, ServiceError> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let can_view = match scope.visibility {
            Visibility::Fleet => true,
            Visibility::Organization(org) => vehicle.contractor_id == Some(org),
            Visibility::Driver => false,
        };
        if !can_view {
            return Err(ServiceError::PermissionDenied);
        }

        if range.from > range.to {
            return Ok(Vec::new());
        }

        let points = self.points.track(vehicle_id, range.from, range.to).await?;
        Ok(points
            .iter()
            .map(|p| TrackPoint {
                lat: p.lat,
                lon: p.lon,
                captured_at: p.captured_at.to_rfc3339(),
                speed_kmh: p.speed_kmh,
                heading_deg: p.heading_deg,
            })
            .collect())
    }

    /// Administrative bulk delete of points older than the cutoff. The
    /// cutoff is validated before any row is touched; a future timestamp
    /// is a client error.
    pub async fn delete_old_points(
        &self,
        scope: Scope,
        cutoff: DeleteCutoff,
    ) -> Result<DeleteOutcome, ServiceError> {
        if !scope.admin {
            return Err(ServiceError::PermissionDenied);
        }

        let now = Utc::now();
        let cutoff = match cutoff {
            DeleteCutoff::Timestamp(t) => t,
            DeleteCutoff::Days(days) if days > 0 => now - Duration::days(days),
            DeleteCutoff::Days(days) => {
                return Err(ServiceError::InvalidInput(format!(
                    "days must be positive, got {days}"
                )))
            }
        };
        if cutoff > now {
            return Err(ServiceError::InvalidInput(
                "cutoff must not be in the future".to_string(),
            ));
        }

        let deleted = self.points.delete_older_than(cutoff).await?;
        Ok(DeleteOutcome { deleted, cutoff })
    }
}
