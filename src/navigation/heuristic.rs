// src/navigation/heuristic.rs
// Cost-to-go estimates guiding the grid search.

use crate::core::{euclidean_distance, GridPos, Map};

/// Radius around obstacles inside which the risk-aware estimate is inflated
pub const DANGER_ZONE_RADIUS: f64 = 5.0;

/// Penalty per unit of intrusion into the danger zone, before safety weighting
pub const PROXIMITY_PENALTY_SCALE: f64 = 10.0;

/// Estimate of the remaining cost from a grid cell to the goal.
///
/// Implementations must be pure: the same inputs always give the same
/// non-negative estimate, and the map is never mutated.
pub trait Heuristic {
    /// Estimated cost from `pos` to `goal`
    fn estimate(&self, pos: GridPos, goal: GridPos) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(GridPos, GridPos) -> f64,
{
    fn estimate(&self, pos: GridPos, goal: GridPos) -> f64 {
        self(pos, goal)
    }
}

/// Straight-line distance to the goal
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceHeuristic;

impl Heuristic for DistanceHeuristic {
    fn estimate(&self, pos: GridPos, goal: GridPos) -> f64 {
        euclidean_distance(&pos.to_point(), &goal.to_point())
    }
}

/// Distance to the goal plus a penalty for cells close to obstacles.
///
/// Not admissible: near obstacles it overestimates, which steers the search
/// away from them at the price of global optimality.
#[derive(Clone, Copy, Debug)]
pub struct RiskAwareHeuristic<'a> {
    map: &'a Map,
    safety_weight: f64,
}

impl<'a> RiskAwareHeuristic<'a> {
    /// Risk-aware estimate over `map`
    pub fn new(map: &'a Map, safety_weight: f64) -> Self {
        RiskAwareHeuristic { map, safety_weight }
    }

    /// Extra cost for standing at `pos`; zero outside the danger zone
    pub fn proximity_penalty(&self, pos: GridPos) -> f64 {
        let min_dist = self.map.min_obstacle_distance(&pos.to_point());
        if min_dist < DANGER_ZONE_RADIUS {
            (DANGER_ZONE_RADIUS - min_dist) * PROXIMITY_PENALTY_SCALE * self.safety_weight
        } else {
            0.0
        }
    }
}

impl Heuristic for RiskAwareHeuristic<'_> {
    fn estimate(&self, pos: GridPos, goal: GridPos) -> f64 {
        DistanceHeuristic.estimate(pos, goal) + self.proximity_penalty(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point, Polygon};

    fn walled_map() -> Map {
        Map::new(
            (50.0, 50.0),
            vec![Polygon::rect(20.0, 0.0, 21.0, 30.0).unwrap()],
            Point::new(5.0, 5.0),
            Point::new(45.0, 5.0),
        )
        .unwrap()
    }

    #[test]
    fn distance_only() {
        let h = DistanceHeuristic;
        assert_eq!(h.estimate(GridPos::new(0, 0), GridPos::new(3, 4)), 5.0);
        assert_eq!(h.estimate(GridPos::new(7, 7), GridPos::new(7, 7)), 0.0);
    }

    #[test]
    fn penalty_inside_danger_zone() {
        let map = walled_map();
        let h = RiskAwareHeuristic::new(&map, 0.8);
        // 2 units from the wall: (5 - 2) * 10 * 0.8
        let pos = GridPos::new(18, 10);
        assert!((h.proximity_penalty(pos) - 24.0).abs() < 1e-9);
        let goal = GridPos::new(18, 20);
        assert!((h.estimate(pos, goal) - 34.0).abs() < 1e-9);
    }

    #[test]
    fn no_penalty_far_away_or_on_empty_map() {
        let map = walled_map();
        let h = RiskAwareHeuristic::new(&map, 0.8);
        assert_eq!(h.proximity_penalty(GridPos::new(5, 5)), 0.0);
        // exactly at the radius is outside the zone
        assert_eq!(h.proximity_penalty(GridPos::new(15, 10)), 0.0);

        let empty = Map::new((10.0, 10.0), vec![], Point::new(1.0, 1.0), Point::new(8.0, 8.0))
            .unwrap();
        let h = RiskAwareHeuristic::new(&empty, 1.0);
        assert_eq!(h.estimate(GridPos::new(0, 0), GridPos::new(0, 3)), 3.0);
    }

    #[test]
    fn closures_are_heuristics() {
        let zero = |_: GridPos, _: GridPos| 0.0;
        assert_eq!(zero.estimate(GridPos::new(1, 1), GridPos::new(9, 9)), 0.0);
    }
}
