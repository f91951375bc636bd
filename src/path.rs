//! Roads the simulated vehicle drives: ordered waypoint polylines plus the
//! catalog the simulator picks them from.

use std::sync::Arc;

use anyhow::ensure;

use crate::geo::Waypoint;

/// An ordered polyline of at least two waypoints. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Path {
    name: String,
    nodes: Vec<Waypoint>,
}

/// One edge between two consecutive waypoints of a path.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub from: Waypoint,
    pub to: Waypoint,
}

impl Path {
    pub fn new(name: impl Into<String>, nodes: Vec<Waypoint>) -> anyhow::Result<Self> {
        let name = name.into();
        ensure!(
            nodes.len() >= 2,
            "path '{}' needs at least two waypoints to be traversable",
            name
        );
        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment `(nodes[index], nodes[index + 1])`, or `None` once the index
    /// has run off the end of the polyline.
    pub fn segment_at(&self, index: usize) -> Option<Segment> {
        if index >= self.nodes.len() - 1 {
            return None;
        }
        Some(Segment {
            from: self.nodes[index],
            to: self.nodes[index + 1],
        })
    }

    pub fn segment_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// One or more named paths a simulator can be started on. Production wiring
/// may later swap in a catalog sourced from a real road network without
/// touching the simulator.
pub trait PathCatalog: Send + Sync {
    /// Path a simulator follows on (re)start. Must be deterministic: the
    /// simulator wraps back onto this path when it exhausts the current one.
    fn starting_path(&self) -> Arc<Path>;
}

/// Fixed in-memory catalog; always hands out the first path.
pub struct StaticCatalog {
    paths: Vec<Arc<Path>>,
}

impl StaticCatalog {
    pub fn new(paths: Vec<Path>) -> anyhow::Result<Self> {
        ensure!(!paths.is_empty(), "path catalog must not be empty");
        Ok(Self {
            paths: paths.into_iter().map(Arc::new).collect(),
        })
    }
}

impl PathCatalog for StaticCatalog {
    fn starting_path(&self) -> Arc<Path> {
        Arc::clone(&self.paths[0])
    }
}

/// Demo routes around Petropavlovsk, used until a real road-network source
/// is wired in. OSM extraction is out of scope.
pub fn demo_routes() -> anyhow::Result<Vec<Path>> {
    Ok(vec![
        Path::new(
            "Primary Highway 1",
            vec![
                Waypoint::new(54.8700, 69.1400),
                Waypoint::new(54.8720, 69.1450),
                Waypoint::new(54.8740, 69.1500),
                Waypoint::new(54.8760, 69.1550),
                Waypoint::new(54.8780, 69.1600),
                Waypoint::new(54.8800, 69.1650),
            ],
        )?,
        Path::new(
            "Primary Highway 2",
            vec![
                Waypoint::new(54.8600, 69.1300),
                Waypoint::new(54.8650, 69.1350),
                Waypoint::new(54.8700, 69.1400),
                Waypoint::new(54.8750, 69.1450),
                Waypoint::new(54.8800, 69.1500),
            ],
        )?,
        Path::new(
            "Primary Highway 3",
            vec![
                Waypoint::new(54.8500, 69.1200),
                Waypoint::new(54.8550, 69.1250),
                Waypoint::new(54.8600, 69.1300),
                Waypoint::new(54.8650, 69.1350),
                Waypoint::new(54.8700, 69.1400),
            ],
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_paths_too_short_to_traverse() {
        assert!(Path::new("empty", vec![]).is_err());
        assert!(Path::new("single", vec![Waypoint::new(54.8, 69.0)]).is_err());
        assert!(Path::new(
            "pair",
            vec![Waypoint::new(54.8, 69.0), Waypoint::new(54.9, 69.1)]
        )
        .is_ok());
    }

    #[test]
    fn segment_lookup_runs_off_the_end() {
        let path = Path::new(
            "three nodes",
            vec![
                Waypoint::new(54.80, 69.00),
                Waypoint::new(54.85, 69.10),
                Waypoint::new(54.90, 69.20),
            ],
        )
        .unwrap();

        assert_eq!(path.segment_count(), 2);
        let first = path.segment_at(0).unwrap();
        assert_eq!(first.from, Waypoint::new(54.80, 69.00));
        assert_eq!(first.to, Waypoint::new(54.85, 69.10));
        assert!(path.segment_at(1).is_some());
        assert!(path.segment_at(2).is_none());
        assert!(path.segment_at(100).is_none());
    }

    #[test]
    fn static_catalog_is_deterministic() {
        let catalog = StaticCatalog::new(demo_routes().unwrap()).unwrap();
        assert_eq!(catalog.starting_path().name(), "Primary Highway 1");
        assert_eq!(catalog.starting_path().name(), "Primary Highway 1");
        assert!(StaticCatalog::new(vec![]).is_err());
    }
}
