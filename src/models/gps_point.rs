use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::provenance::Provenance;

/// One immutable telemetry sample. Append-only; ordered per vehicle by
/// `captured_at`.
#[derive(Debug, Clone, FromRow)]
pub struct GpsPoint {
    pub id: Uuid,
    pub gps_device_id: Option<Uuid>,
    pub vehicle_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub speed_kmh: f64,
    pub heading_deg: f64,
    pub raw_payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GpsPoint {
    /// Parses the provenance payload, if any. An unparseable payload is
    /// treated as absent rather than an error; the flag is informational.
    pub fn provenance(&self) -> Option<Provenance> {
        self.raw_payload
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    pub fn is_simulated(&self) -> bool {
        self.provenance().map(|p| p.simulated).unwrap_or(false)
    }
}
