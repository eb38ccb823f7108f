//! Navigation engine for SYNAPSE
//!
//! This module handles candidate route search over the scenario grid, the
//! cost-to-go heuristics that steer it, and the analysis that turns a route
//! into comparable raw metrics.

/// Raw path metrics
pub mod analyzer;
/// Cost-to-go estimates
pub mod heuristic;
/// Iterative k-path A*
pub mod planner;

pub use analyzer::{analyze_path, PathMetrics, SHARP_TURN_DEGREES};
pub use heuristic::{
    DistanceHeuristic, Heuristic, RiskAwareHeuristic, DANGER_ZONE_RADIUS, PROXIMITY_PENALTY_SCALE,
};
pub use planner::{astar_search, IterationOutcome, SearchConfig, SearchSession};

use crate::core::{GridPos, Point};

/// Convert a grid path into real-valued waypoints
pub fn to_points(path: &[GridPos]) -> Vec<Point> {
    path.iter().map(|pos| pos.to_point()).collect()
}
