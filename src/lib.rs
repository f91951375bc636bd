//! Vehicle motion simulation and live-telemetry backend: a background
//! producer synthesizes GPS points along a road at a fixed speed, detects
//! geofence entries, and persists timestamped samples that the read side
//! classifies into live status and serves as time-ranged tracks.
//!
//! HTTP transport and authentication live in the host service; this crate
//! exposes the producer tasks and the [`service::MonitoringService`] read
//! API they mount.

pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod path;
pub mod service;
pub mod sim;
pub mod stores;
