//! Synthesizes a moving vehicle: one telemetry sample per tick, walking a
//! path at a fixed real-world speed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use crate::geo::{self, Waypoint};
use crate::models::{GpsPoint, Provenance};
use crate::path::{Path, PathCatalog};
use crate::stores::PointStore;

use super::geofence::GeofenceDetector;

const PROVENANCE_SOURCE: &str = "route-simulator";

#[derive(Debug, Clone, Copy)]
pub struct SimulatorConfig {
    pub speed_kmh: f64,
    pub tick_interval: Duration,
}

/// Traversal state: which path, which segment, how far along it.
/// Owned by one simulator, mutated once per tick.
#[derive(Clone)]
struct Cursor {
    path: Arc<Path>,
    segment_index: usize,
    progress: f64,
}

impl Cursor {
    fn start(catalog: &dyn PathCatalog) -> Self {
        Self {
            path: catalog.starting_path(),
            segment_index: 0,
            progress: 0.0,
        }
    }

    /// Moves `distance` meters along the path and returns the new position
    /// and heading. Single-step look-ahead: when the current segment has
    /// less than `distance` left, the cursor jumps to the next segment and
    /// any overshoot within the tick is absorbed by clamping progress,
    /// not carried over. Sub-meter discrepancy at normal tick rates.
    fn advance(
        &mut self,
        catalog: &dyn PathCatalog,
        distance: f64,
    ) -> anyhow::Result<(Waypoint, f64)> {
        let mut segment = match self.path.segment_at(self.segment_index) {
            Some(s) => s,
            None => {
                *self = Self::start(catalog);
                self.path
                    .segment_at(0)
                    .context("starting path has no traversable segment")?
            }
        };

        let mut segment_length = geo::distance(segment.from, segment.to);
        if (1.0 - self.progress) * segment_length < distance {
            self.segment_index += 1;
            self.progress = 0.0;
            segment = match self.path.segment_at(self.segment_index) {
                Some(s) => s,
                None => {
                    *self = Self::start(catalog);
                    self.path
                        .segment_at(0)
                        .context("starting path has no traversable segment")?
                }
            };
            segment_length = geo::distance(segment.from, segment.to);
        }

        self.progress += (distance / segment_length).min(1.0);

        let position = geo::interpolate(segment.from, segment.to, self.progress);
        // Heading is constant across a segment; it does not blend with the
        // next segment when a tick crosses a boundary.
        let heading = geo::bearing(segment.from, segment.to);
        Ok((position, heading))
    }
}

pub struct MotionSimulator {
    catalog: Arc<dyn PathCatalog>,
    detector: GeofenceDetector,
    points: Arc<dyn PointStore>,
    vehicle_id: Uuid,
    speed_kmh: f64,
    tick_interval: Duration,
    distance_per_tick: f64,
    cursor: Cursor,
}

impl MotionSimulator {
    pub fn new(
        config: SimulatorConfig,
        vehicle_id: Uuid,
        catalog: Arc<dyn PathCatalog>,
        detector: GeofenceDetector,
        points: Arc<dyn PointStore>,
    ) -> anyhow::Result<Self> {
        ensure!(config.speed_kmh > 0.0, "simulator speed must be positive");
        ensure!(
            !config.tick_interval.is_zero(),
            "simulator tick interval must be positive"
        );

        let speed_ms = config.speed_kmh / 3.6;
        let distance_per_tick = speed_ms * config.tick_interval.as_secs_f64();
        let cursor = Cursor::start(catalog.as_ref());

        Ok(Self {
            catalog,
            detector,
            points,
            vehicle_id,
            speed_kmh: config.speed_kmh,
            tick_interval: config.tick_interval,
            distance_per_tick,
            cursor,
        })
    }

    /// One motion update. Cursor and geofence state are committed only after
    /// the sample persists, so a failed tick leaves both untouched and the
    /// next tick retries from the same place.
    async fn tick(&mut self) -> anyhow::Result<()> {
        let mut cursor = self.cursor.clone();
        let (position, heading_deg) =
            cursor.advance(self.catalog.as_ref(), self.distance_per_tick)?;

        let now = Utc::now();
        let evaluation = self.detector.evaluate(position, now).await?;
        if let Some(event) = &evaluation.event {
            info!(
                polygon = %event.polygon_name,
                camera_id = ?event.camera_id,
                "vehicle entered geofence"
            );
        }

        let provenance = Provenance {
            simulated: true,
            source: Some(PROVENANCE_SOURCE.to_string()),
            entry_event: evaluation.event,
        };

        let point = GpsPoint {
            id: Uuid::new_v4(),
            gps_device_id: None,
            vehicle_id: self.vehicle_id,
            captured_at: now,
            lat: position.lat,
            lon: position.lon,
            // Reported speed is the configured constant, not the actual
            // inter-tick displacement.
            speed_kmh: self.speed_kmh,
            heading_deg,
            raw_payload: Some(serde_json::to_string(&provenance)?),
            created_at: now,
        };

        self.points.insert(&point).await?;

        self.cursor = cursor;
        self.detector.commit(evaluation.state);
        Ok(())
    }

    /// Tick loop. A failed tick is logged and skipped; the loop stays on
    /// schedule with no backlog of missed ticks.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            vehicle_id = %self.vehicle_id,
            path = self.cursor.path.name(),
            speed_kmh = self.speed_kmh,
            "motion simulator started"
        );

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(vehicle_id = %self.vehicle_id, "motion simulator stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(vehicle_id = %self.vehicle_id, "failed to update simulated position: {e:#}");
                    }
                }
            }
        }
    }
}
