// core/geometry.rs

// Distance and turning-angle primitives shared by the search engine, the
// heuristics and the path analyzer. Real-valued points are nalgebra points;
// the grid search works on integer cells and converts on demand.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Real-valued 2-D position
pub type Point = Point2<f64>;

/// Integer grid cell visited by the search engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridPos {
    /// Cell at `(x, y)`
    pub const fn new(x: i32, y: i32) -> Self {
        GridPos { x, y }
    }

    /// Grid cell holding a real position (coordinates truncate toward zero)
    pub fn from_point(p: &Point) -> Self {
        GridPos {
            x: p.x as i32,
            y: p.y as i32,
        }
    }

    /// Integer-valued point of this cell
    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// Neighbouring cell shifted by `(dx, dy)`
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        GridPos {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Euclidean distance between two points
#[inline]
pub fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    nalgebra::distance(a, b)
}

/// Angle in degrees at vertex `p2` for the polyline `p1 -> p2 -> p3`.
///
/// A straight continuation gives 180°, a reversal 0°. A repeated point
/// (zero-length leg) is treated as straight and also gives 180°.
pub fn calculate_angle(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    let v1: Vector2<f64> = p1 - p2;
    let v2: Vector2<f64> = p3 - p2;

    let mag_v1 = v1.norm();
    let mag_v2 = v2.norm();
    if mag_v1 == 0.0 || mag_v2 == 0.0 {
        return 180.0;
    }

    // Clamp guards acos against rounding just outside [-1, 1]
    let cos_angle = (v1.dot(&v2) / (mag_v1 * mag_v2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Squared distance from `p` to the segment `a`-`b`.
///
/// Projects onto the segment; when the projection falls outside it the
/// nearer endpoint is used.
pub fn point_segment_distance_squared(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = b - a;
    let seg_len_sq = ab.norm_squared();
    if seg_len_sq == 0.0 {
        return (p - a).norm_squared();
    }

    let t = (p - a).dot(&ab) / seg_len_sq;
    if 0.0 < t && t < 1.0 {
        let proj = a + ab * t;
        (p - proj).norm_squared()
    } else {
        (p - a).norm_squared().min((p - b).norm_squared())
    }
}

/// Distance from `p` to the segment `a`-`b`
pub fn point_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    point_segment_distance_squared(p, a, b).sqrt()
}

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

fn on_segment(p: &Point, a: &Point, b: &Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether the closed segments `p1`-`p2` and `p3`-`p4` share any point,
/// touching and collinear overlap included
pub fn segments_intersect(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> bool {
    let d1 = cross(p3, p4, p1);
    let d2 = cross(p3, p4, p2);
    let d3 = cross(p1, p2, p3);
    let d4 = cross(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p1, p3, p4))
        || (d2 == 0.0 && on_segment(p2, p3, p4))
        || (d3 == 0.0 && on_segment(p3, p1, p2))
        || (d4 == 0.0 && on_segment(p4, p1, p2))
}

/// Summed length of consecutive segments
pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| euclidean_distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[rstest]
    #[case(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), 180.0)]
    #[case(p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0), 90.0)]
    #[case(p(2.0, 2.0), p(2.0, 2.0), p(5.0, 1.0), 180.0)]
    #[case(p(1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0), 0.0)]
    #[case(p(1.0, 1.0), p(0.0, 0.0), p(1.0, 0.0), 45.0)]
    fn turning_angle(#[case] a: Point, #[case] b: Point, #[case] c: Point, #[case] expected: f64) {
        assert!((calculate_angle(&a, &b, &c) - expected).abs() < 1e-9);
    }

    #[test]
    fn repeated_point_is_exactly_straight() {
        let q = p(3.0, 4.0);
        assert_eq!(calculate_angle(&q, &q, &p(7.0, 1.0)), 180.0);
    }

    #[test]
    fn distance_and_polyline_length() {
        assert_eq!(euclidean_distance(&p(0.0, 0.0), &p(3.0, 4.0)), 5.0);
        let line = [p(0.0, 0.0), p(3.0, 4.0), p(3.0, 6.0)];
        assert!((polyline_length(&line) - 7.0).abs() < 1e-12);
        assert_eq!(polyline_length(&line[..1]), 0.0);
    }

    #[test]
    fn segment_distance_projects_or_clamps() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 0.0);
        assert!((point_segment_distance(&p(5.0, 3.0), &a, &b) - 3.0).abs() < 1e-12);
        assert!((point_segment_distance(&p(13.0, 4.0), &a, &b) - 5.0).abs() < 1e-12);
        assert!((point_segment_distance(&p(1.0, 1.0), &a, &a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn segment_intersection_cases() {
        assert!(segments_intersect(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)));
        assert!(!segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)));
        // touching at an endpoint counts
        assert!(segments_intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(1.0, 5.0)));
        // collinear overlap
        assert!(segments_intersect(&p(0.0, 0.0), &p(3.0, 0.0), &p(2.0, 0.0), &p(5.0, 0.0)));
    }

    #[test]
    fn grid_conversion_truncates() {
        assert_eq!(GridPos::from_point(&p(5.9, 7.2)), GridPos::new(5, 7));
        assert_eq!(GridPos::new(2, 3).offset(-1, 1), GridPos::new(1, 4));
        assert_eq!(GridPos::new(2, 3).to_point(), p(2.0, 3.0));
    }
}
