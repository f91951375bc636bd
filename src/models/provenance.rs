//! Auxiliary metadata carried in a GPS point's raw payload: the simulated
//! flag plus, when the vehicle crossed into a geofence on that tick, the
//! entry-event descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const EVENT_ENTRY: &str = "ENTRY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub simulated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_event: Option<EntryEvent>,
}

/// Fired once per geofence-entry transition; never on dwell or exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryEvent {
    pub polygon_id: Uuid,
    pub polygon_name: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<Uuid>,
}
