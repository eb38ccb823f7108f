//! Route-selection policies
//!
//! An agent searches for candidate routes on a [`Map`], scores each with a
//! weight profile and returns the winner. The static agent always uses the
//! same profile; the SYNAPSE agent picks one from a risk assessment of the map.

/// Fixed-weight policy
pub mod static_agent;
/// Risk-adaptive policy
pub mod synapse_agent;

pub use static_agent::StaticAgent;
pub use synapse_agent::{RiskAssessment, SynapseAgent};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{GridPos, Map, Point};
use crate::navigation::{analyze_path, astar_search, to_points, Heuristic, PathMetrics, SearchConfig};

/// Raw safety counts are small next to distances, so they are scaled up before weighting
pub const SAFETY_AMPLIFICATION: f64 = 20.0;

/// Scalar weights combining path metrics into one score (lower score wins)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    /// Weight of path time
    pub time: f64,
    /// Weight of path energy
    pub energy: f64,
    /// Weight of the amplified safety count
    pub safety: f64,
}

impl WeightProfile {
    /// Profile from its three weights
    pub const fn new(time: f64, energy: f64, safety: f64) -> Self {
        WeightProfile {
            time,
            energy,
            safety,
        }
    }

    /// Weighted score of a metric vector, with safety amplified
    pub fn score(&self, metrics: &PathMetrics) -> f64 {
        self.time * metrics.time
            + self.energy * metrics.energy
            + self.safety * metrics.safety * SAFETY_AMPLIFICATION
    }
}

/// Outcome of one solve call
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Winning route, empty when nothing usable was found
    pub path: Vec<Point>,
    /// Raw metrics of the winning route (infinite when not found)
    pub metrics: PathMetrics,
    /// Score of the winning route under `profile`
    pub score: f64,
    /// Profile used for search and scoring
    pub profile: WeightProfile,
    /// Number of candidates the search produced
    pub candidates: usize,
}

impl Solution {
    fn not_found(profile: WeightProfile, candidates: usize) -> Self {
        Solution {
            path: Vec::new(),
            metrics: PathMetrics::unusable(),
            score: f64::INFINITY,
            profile,
            candidates,
        }
    }

    /// Whether a usable route was selected
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Common contract of every route-selection policy
pub trait Agent {
    /// Display name used in logs and reports
    fn name(&self) -> &str;

    /// Search the map and return the best candidate route
    fn solve(&self, map: &Map) -> Solution;
}

/// Search with `heuristic`, score every candidate with `profile` and keep the
/// first lowest score in discovery order
pub(crate) fn select_best_path<H: Heuristic + ?Sized>(
    agent: &str,
    map: &Map,
    heuristic: &H,
    profile: WeightProfile,
    search: &SearchConfig,
) -> Solution {
    let start = GridPos::from_point(&map.start());
    let end = GridPos::from_point(&map.end());

    let candidates = astar_search(map, start, end, heuristic, search);
    if candidates.is_empty() {
        info!("[{}] No paths found.", agent);
        return Solution::not_found(profile, 0);
    }

    info!(
        "[{}] Found {} candidate paths. Evaluating...",
        agent,
        candidates.len()
    );

    let scored: Vec<(Vec<Point>, PathMetrics, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let points = to_points(candidate);
            let metrics = analyze_path(&points, map);
            let score = profile.score(&metrics);
            debug!("[{}]   - Path {}: Score = {:.2}", agent, i + 1, score);
            (points, metrics, score)
        })
        .collect();

    let scores: Vec<f64> = scored.iter().map(|(_, _, score)| *score).collect();
    match first_minimum(&scores).and_then(|i| scored.into_iter().nth(i)) {
        Some((path, metrics, score)) => {
            info!("[{}] Selected path with score {:.2}.", agent, score);
            Solution {
                path,
                metrics,
                score,
                profile,
                candidates: candidates.len(),
            }
        }
        None => {
            info!("[{}] No candidate produced a usable path.", agent);
            Solution::not_found(profile, candidates.len())
        }
    }
}

/// Index of the first strictly lowest finite score; an exact tie keeps the
/// earlier entry
pub(crate) fn first_minimum(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        let best_score = best.map_or(f64::INFINITY, |(_, s)| s);
        if score < best_score {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn score_amplifies_safety() {
        let profile = WeightProfile::new(0.4, 0.2, 0.4);
        let metrics = PathMetrics {
            time: 10.0,
            energy: 10.0,
            safety: 2.0,
            payload_integrity: 7.0,
        };
        // 4 + 2 + 16; payload integrity is not part of the agent score
        assert!((profile.score(&metrics) - 22.0).abs() < 1e-12);
        assert_eq!(profile.score(&PathMetrics::unusable()), f64::INFINITY);
    }

    #[rstest]
    #[case::exact_tie_keeps_earlier(&[12.5, 12.5, 13.0], Some(0))]
    #[case::later_lower_wins(&[12.5, 9.0, 9.0], Some(1))]
    #[case::infinite_first_is_skipped(&[f64::INFINITY, 4.0], Some(1))]
    #[case::all_infinite(&[f64::INFINITY, f64::INFINITY], None)]
    #[case::empty(&[], None)]
    fn first_minimum_in_discovery_order(#[case] scores: &[f64], #[case] expected: Option<usize>) {
        assert_eq!(first_minimum(scores), expected);
    }

    #[test]
    fn start_equals_end_is_not_a_usable_route() {
        let map = Map::new(
            (20.0, 20.0),
            vec![],
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
        )
        .unwrap();
        let profile = WeightProfile::new(0.4, 0.2, 0.4);
        let solution = select_best_path(
            "test",
            &map,
            &crate::navigation::DistanceHeuristic,
            profile,
            &SearchConfig::default(),
        );
        assert!(!solution.found());
        assert_eq!(solution.candidates, 3);
        assert_eq!(solution.metrics, PathMetrics::unusable());
    }
}
