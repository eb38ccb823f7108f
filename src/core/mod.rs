// core/mod.rs

// Spatial foundation for the planners: geometry primitives and the immutable
// scenario map with its collision and proximity queries.

/// Points, grid cells and distance helpers
pub mod geometry;
/// Polygons and the scenario map
pub mod map;

// Re-export key types so planners and agents import from one place
pub use geometry::{calculate_angle, euclidean_distance, polyline_length, GridPos, Point};
pub use map::{Map, Polygon};
