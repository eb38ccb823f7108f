// src/navigation/analyzer.rs
// Converts a path into the raw metrics the agents and the report compare.

use serde::{Deserialize, Serialize};

use crate::core::{calculate_angle, polyline_length, Map, Point};

/// Turning angles below this (degrees) count as sharp turns
pub const SHARP_TURN_DEGREES: f64 = 120.0;

/// Raw path metrics; lower is better for every field.
///
/// `energy` currently tracks the same quantity as `time` (path length). The
/// duplication is kept until a dedicated energy model exists.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathMetrics {
    /// Path length
    pub time: f64,
    /// Path length (no separate energy model yet)
    pub energy: f64,
    /// Waypoints with at least one colliding neighbour cell
    pub safety: f64,
    /// Sharp turns along the path
    pub payload_integrity: f64,
}

impl PathMetrics {
    /// Metrics of a missing or unusable path
    pub fn unusable() -> Self {
        PathMetrics {
            time: f64::INFINITY,
            energy: f64::INFINITY,
            safety: f64::INFINITY,
            payload_integrity: f64::INFINITY,
        }
    }

    /// True for the metrics of a missing path
    pub fn is_unusable(&self) -> bool {
        self.time.is_infinite()
    }

    /// Field names in report order
    pub const FIELDS: [&'static str; 4] = ["time", "energy", "safety", "payload_integrity"];

    /// Field values in the order of [`PathMetrics::FIELDS`]
    pub fn values(&self) -> [f64; 4] {
        [self.time, self.energy, self.safety, self.payload_integrity]
    }

    /// Inverse of `values`
    pub fn from_values(values: [f64; 4]) -> Self {
        PathMetrics {
            time: values[0],
            energy: values[1],
            safety: values[2],
            payload_integrity: values[3],
        }
    }
}

/// Count waypoints whose 8-neighbourhood touches a collision, once per waypoint
fn near_obstacle_count(path: &[Point], map: &Map) -> usize {
    path.iter()
        .filter(|pos| {
            (-1..=1).any(|dx| {
                (-1..=1).any(|dy| {
                    (dx, dy) != (0, 0)
                        && map.is_collision(&Point::new(pos.x + dx as f64, pos.y + dy as f64))
                })
            })
        })
        .count()
}

fn sharp_turn_count(path: &[Point]) -> usize {
    path.windows(3)
        .filter(|w| calculate_angle(&w[0], &w[1], &w[2]) < SHARP_TURN_DEGREES)
        .count()
}

/// Raw metrics for `path` on `map`; fewer than two points is unusable
pub fn analyze_path(path: &[Point], map: &Map) -> PathMetrics {
    if path.len() < 2 {
        return PathMetrics::unusable();
    }

    let length = polyline_length(path);
    PathMetrics {
        time: length,
        energy: length,
        safety: near_obstacle_count(path, map) as f64,
        payload_integrity: sharp_turn_count(path) as f64,
    }
}
