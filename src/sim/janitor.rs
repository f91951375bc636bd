//! Time-based retention for GPS points, swept on a cadence much coarser
//! than sample production.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::stores::PointStore;

const SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

pub struct RetentionJanitor {
    points: Arc<dyn PointStore>,
    retention_days: i64,
}

impl RetentionJanitor {
    pub fn new(points: Arc<dyn PointStore>, retention_days: i64) -> Self {
        Self {
            points,
            retention_days,
        }
    }

    /// Hourly sweep loop. Never starts when retention is disabled.
    pub async fn run(self, cancel: CancellationToken) {
        if self.retention_days <= 0 {
            info!("gps point retention disabled, janitor not started");
            return;
        }
        info!(retention_days = self.retention_days, "retention janitor started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("retention janitor stopped");
                    return;
                }
                _ = tokio::time::sleep(SWEEP_PERIOD) => {
                    if let Err(e) = self.sweep().await {
                        error!("failed to clean up expired gps points: {e:#}");
                    }
                }
            }
        }
    }

    async fn sweep(&self) -> anyhow::Result<u64> {
        let cutoff = Utc::now() - chrono::Duration::days(self.retention_days);
        let deleted = self.points.delete_older_than(cutoff).await?;
        if deleted > 0 {
            info!(deleted, %cutoff, "cleaned up expired gps points");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GpsPoint;
    use crate::stores::memory::MemoryPointStore;
    use uuid::Uuid;

    fn point_aged_days(vehicle_id: Uuid, days: i64) -> GpsPoint {
        let at = Utc::now() - chrono::Duration::days(days);
        GpsPoint {
            id: Uuid::new_v4(),
            gps_device_id: None,
            vehicle_id,
            captured_at: at,
            lat: 54.87,
            lon: 69.14,
            speed_kmh: 20.0,
            heading_deg: 0.0,
            raw_payload: None,
            created_at: at,
        }
    }

    #[tokio::test]
    async fn sweep_deletes_only_expired_points() {
        let points = Arc::new(MemoryPointStore::new());
        let vehicle = Uuid::new_v4();
        for days in [1, 6, 8, 10] {
            points.push(point_aged_days(vehicle, days));
        }

        let janitor = RetentionJanitor::new(points.clone(), 7);
        let deleted = janitor.sweep().await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(points.len(), 2);
    }

    #[tokio::test]
    async fn disabled_retention_never_sweeps() {
        let points = Arc::new(MemoryPointStore::new());
        points.push(point_aged_days(Uuid::new_v4(), 100));

        // run() returns immediately instead of looping.
        let janitor = RetentionJanitor::new(points.clone(), 0);
        janitor.run(CancellationToken::new()).await;

        assert_eq!(points.len(), 1);
    }
}
