pub mod gps_point;
pub mod provenance;
pub mod vehicle;

pub use gps_point::GpsPoint;
pub use provenance::{EntryEvent, Provenance, EVENT_ENTRY};
pub use vehicle::{Vehicle, VehicleStatus};
