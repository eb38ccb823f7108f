// core/map.rs

// Scenario map: rectangular bounds, a set of polygonal obstacles and the
// start/end points of the route. Immutable after construction, so one map can
// be shared by any number of concurrent readers.

use log::debug;
use serde::{Deserialize, Serialize};

use super::geometry::{point_segment_distance, segments_intersect, Point};
use crate::SynapseError;

/// Tolerance for treating a point as lying on a polygon edge
const EDGE_EPSILON: f64 = 1e-9;

/// Simple polygon treated as a closed region (boundary belongs to the obstacle)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from its vertex ring (implicitly closed)
    pub fn new(vertices: Vec<Point>) -> Result<Self, SynapseError> {
        if vertices.len() < 3 {
            return Err(SynapseError::InvalidMap(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(SynapseError::InvalidMap(
                "polygon vertex has a non-finite coordinate".to_string(),
            ));
        }
        Ok(Polygon { vertices })
    }

    /// Axis-aligned rectangle spanning `(x0, y0)`-`(x1, y1)`
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, SynapseError> {
        Polygon::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// Vertices in construction order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    fn on_boundary(&self, p: &Point) -> bool {
        self.edges()
            .any(|(a, b)| point_segment_distance(p, a, b) <= EDGE_EPSILON)
    }

    /// Closed-region containment: interior or boundary
    pub fn contains(&self, p: &Point) -> bool {
        if self.on_boundary(p) {
            return true;
        }

        // Even-odd ray cast towards +x
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance from `p` to the region; zero inside or on the boundary
    pub fn distance_to(&self, p: &Point) -> f64 {
        if self.contains(p) {
            return 0.0;
        }
        self.edges()
            .map(|(a, b)| point_segment_distance(p, a, b))
            .fold(f64::INFINITY, f64::min)
    }

    /// Distance from the segment `a`-`b` to the region; zero when they touch
    pub fn distance_to_segment(&self, a: &Point, b: &Point) -> f64 {
        if self.contains(a) || self.contains(b) {
            return 0.0;
        }
        if self.edges().any(|(e1, e2)| segments_intersect(a, b, e1, e2)) {
            return 0.0;
        }
        self.edges()
            .map(|(e1, e2)| {
                point_segment_distance(e1, a, b)
                    .min(point_segment_distance(a, e1, e2))
                    .min(point_segment_distance(b, e1, e2))
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Enclosed area (shoelace formula, orientation independent)
    pub fn area(&self) -> f64 {
        let twice: f64 = self
            .edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        twice.abs() / 2.0
    }
}

/// Scenario map consumed by the planners
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Map {
    width: f64,
    height: f64,
    obstacles: Vec<Polygon>,
    start: Point,
    end: Point,
}

impl Map {
    /// Create a map; dimensions must be positive and finite.
    ///
    /// Start and end are taken as given: the scenario generator guarantees
    /// they are free and in bounds.
    pub fn new(
        dimensions: (f64, f64),
        obstacles: Vec<Polygon>,
        start: Point,
        end: Point,
    ) -> Result<Self, SynapseError> {
        let (width, height) = dimensions;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SynapseError::InvalidMap(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        debug!(
            "Map {}x{} with {} obstacles, start=({}, {}) end=({}, {})",
            width,
            height,
            obstacles.len(),
            start.x,
            start.y,
            end.x,
            end.y
        );

        Ok(Map {
            width,
            height,
            obstacles,
            start,
            end,
        })
    }

    /// Width and height
    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Obstacle polygons
    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// Start point
    pub fn start(&self) -> Point {
        self.start
    }

    /// Goal point
    pub fn end(&self) -> Point {
        self.end
    }

    /// True outside `[0, width) x [0, height)` or inside any obstacle
    pub fn is_collision(&self, p: &Point) -> bool {
        if !(0.0 <= p.x && p.x < self.width && 0.0 <= p.y && p.y < self.height) {
            return true;
        }
        self.obstacles.iter().any(|obs| obs.contains(p))
    }

    /// Distance to the nearest obstacle (infinite on an empty map)
    pub fn min_obstacle_distance(&self, p: &Point) -> f64 {
        self.obstacles
            .iter()
            .map(|obs| obs.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Sum of obstacle areas (overlaps are counted twice)
    pub fn obstacle_area(&self) -> f64 {
        self.obstacles.iter().map(Polygon::area).sum()
    }

    /// Obstacle-covered fraction of the map area
    pub fn obstacle_density(&self) -> f64 {
        self.obstacle_area() / (self.width * self.height)
    }

    /// Number of obstacles within `buffer` of the straight start-end segment
    pub fn corridor_clutter(&self, buffer: f64) -> usize {
        self.obstacles
            .iter()
            .filter(|obs| obs.distance_to_segment(&self.start, &self.end) <= buffer)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[fixture]
    fn square() -> Polygon {
        Polygon::rect(10.0, 10.0, 20.0, 20.0).unwrap()
    }

    #[fixture]
    fn two_squares() -> Map {
        Map::new(
            (50.0, 50.0),
            vec![
                Polygon::rect(15.0, 15.0, 20.0, 20.0).unwrap(),
                Polygon::rect(30.0, 30.0, 35.0, 35.0).unwrap(),
            ],
            p(5.0, 5.0),
            p(45.0, 45.0),
        )
        .unwrap()
    }

    #[rstest]
    #[case(p(15.0, 15.0), true)]
    #[case(p(10.0, 15.0), true)]
    #[case(p(20.0, 20.0), true)]
    #[case(p(9.99, 15.0), false)]
    #[case(p(25.0, 15.0), false)]
    fn closed_containment(square: Polygon, #[case] point: Point, #[case] inside: bool) {
        assert_eq!(square.contains(&point), inside);
    }

    #[test]
    fn concave_polygon_containment() {
        // L-shape with the notch at the top right
        let l = Polygon::new(vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ])
        .unwrap();
        assert!(l.contains(&p(1.0, 3.0)));
        assert!(!l.contains(&p(3.0, 3.0)));
        assert_eq!(l.area(), 12.0);
    }

    #[rstest]
    fn distances(square: Polygon) {
        assert_eq!(square.distance_to(&p(15.0, 15.0)), 0.0);
        assert!((square.distance_to(&p(23.0, 24.0)) - 5.0).abs() < 1e-12);
        assert!((square.distance_to(&p(5.0, 12.0)) - 5.0).abs() < 1e-12);
        assert_eq!(square.distance_to_segment(&p(0.0, 15.0), &p(30.0, 15.0)), 0.0);
        assert!((square.distance_to_segment(&p(0.0, 25.0), &p(30.0, 25.0)) - 5.0).abs() < 1e-12);
        assert_eq!(square.area(), 100.0);
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(Map::new((-1.0, 10.0), vec![], p(0.0, 0.0), p(1.0, 1.0)).is_err());
        assert!(Map::new((10.0, 0.0), vec![], p(0.0, 0.0), p(1.0, 1.0)).is_err());
        assert!(Polygon::new(vec![p(0.0, 0.0), p(1.0, 1.0)]).is_err());
        assert!(Polygon::new(vec![p(0.0, 0.0), p(1.0, f64::NAN), p(2.0, 0.0)]).is_err());
    }

    #[rstest]
    fn collision_queries(two_squares: Map) {
        assert!(two_squares.is_collision(&p(-1.0, 5.0)));
        assert!(two_squares.is_collision(&p(50.0, 5.0)));
        assert!(two_squares.is_collision(&p(5.0, 50.0)));
        assert!(two_squares.is_collision(&p(17.0, 17.0)));
        assert!(two_squares.is_collision(&p(15.0, 18.0)));
        assert!(!two_squares.is_collision(&p(0.0, 0.0)));
        assert!(!two_squares.is_collision(&p(49.0, 49.0)));
        assert!(!two_squares.is_collision(&p(25.0, 25.0)));
    }

    #[rstest]
    fn risk_inputs(two_squares: Map) {
        assert_eq!(two_squares.obstacle_area(), 50.0);
        assert!((two_squares.obstacle_density() - 0.02).abs() < 1e-12);
        // both squares straddle the diagonal
        assert_eq!(two_squares.corridor_clutter(8.0), 2);
        assert!((two_squares.min_obstacle_distance(&p(25.0, 15.0)) - 5.0).abs() < 1e-12);

        let empty = Map::new((50.0, 50.0), vec![], p(5.0, 5.0), p(45.0, 45.0)).unwrap();
        assert_eq!(empty.min_obstacle_distance(&p(1.0, 1.0)), f64::INFINITY);
        assert_eq!(empty.corridor_clutter(8.0), 0);
    }
}
