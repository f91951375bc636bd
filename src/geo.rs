//! Great-circle math used by the motion simulator.

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 coordinate pair. Immutable once part of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine great-circle distance between two waypoints, in meters.
pub fn distance(a: Waypoint, b: Waypoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing from `a` to `b` in degrees, normalized into [0, 360).
pub fn bearing(a: Waypoint, b: Waypoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    // atan2 yields (-180, 180]; shift before the modulo so negatives land in range.
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Linear interpolation on raw lat/lon components. Not a geodesic slerp;
/// fine at the sub-kilometer segment lengths the simulator walks.
/// `t` must already be clamped to [0, 1] by the caller.
pub fn interpolate(a: Waypoint, b: Waypoint, t: f64) -> Waypoint {
    Waypoint {
        lat: a.lat + (b.lat - a.lat) * t,
        lon: a.lon + (b.lon - a.lon) * t,
    }
}
