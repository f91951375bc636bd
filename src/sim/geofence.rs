//! Edge-triggered geofence detection. An entry event fires exactly once per
//! outside-to-inside transition; dwelling inside and leaving fire nothing
//! (there is deliberately no exit event).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::geo::Waypoint;
use crate::models::{EntryEvent, EVENT_ENTRY};
use crate::stores::{CameraStore, PolygonStore, CAMERA_KIND_LPR};

/// Membership carried between ticks. Overwritten every tick, never persisted.
#[derive(Debug, Clone, Default)]
pub struct GeofenceState {
    inside: Option<Uuid>,
}

/// Result of one containment pass. The caller commits the state only after
/// the tick's sample has been persisted, so a dropped tick retries the
/// transition next time.
#[derive(Debug)]
pub struct Evaluation {
    pub state: GeofenceState,
    pub event: Option<EntryEvent>,
}

pub struct GeofenceDetector {
    polygons: Arc<dyn PolygonStore>,
    cameras: Arc<dyn CameraStore>,
    state: GeofenceState,
}

impl GeofenceDetector {
    pub fn new(polygons: Arc<dyn PolygonStore>, cameras: Arc<dyn CameraStore>) -> Self {
        Self {
            polygons,
            cameras,
            state: GeofenceState::default(),
        }
    }

    /// Tests the position against the active polygon set, re-fetched every
    /// tick so geometry edits take effect on the next tick. First containing
    /// polygon wins; overlaps are not disambiguated further.
    pub async fn evaluate(&self, position: Waypoint, at: DateTime<Utc>) -> anyhow::Result<Evaluation> {
        let polygons = self.polygons.list_active().await?;

        let mut now_inside = None;
        for polygon in &polygons {
            if self
                .polygons
                .contains(polygon.id, position.lat, position.lon)
                .await?
            {
                now_inside = Some(polygon);
                break;
            }
        }

        let event = match (&self.state.inside, now_inside) {
            (None, Some(polygon)) => {
                let camera_id = self
                    .cameras
                    .list_by_polygon(polygon.id)
                    .await?
                    .into_iter()
                    .find(|c| c.is_active && c.kind == CAMERA_KIND_LPR)
                    .map(|c| c.id);
                Some(EntryEvent {
                    polygon_id: polygon.id,
                    polygon_name: polygon.name.clone(),
                    event_type: EVENT_ENTRY.to_string(),
                    timestamp: at,
                    camera_id,
                })
            }
            _ => None,
        };

        Ok(Evaluation {
            state: GeofenceState {
                inside: now_inside.map(|p| p.id),
            },
            event,
        })
    }

    pub fn commit(&mut self, state: GeofenceState) {
        self.state = state;
    }
}
