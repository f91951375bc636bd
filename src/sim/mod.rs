pub mod geofence;
pub mod janitor;
pub mod simulator;

pub use geofence::GeofenceDetector;
pub use janitor::RetentionJanitor;
pub use simulator::{MotionSimulator, SimulatorConfig};
