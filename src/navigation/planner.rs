// src/navigation/planner.rs
// Multi-path grid A*: finds up to k diverse routes between two cells.

// Each iteration runs an 8-connected A* over the map. Cells used as interior
// nodes of earlier routes are excluded from expansion, and a g-score history
// shared by all iterations only admits nodes reached more cheaply than ever
// before. The result is a greedy diversification, not an exact k-shortest-paths
// enumeration: excluding nodes rather than edges can hide valid alternatives.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::heuristic::Heuristic;
use crate::core::{GridPos, Map};

/// Axis-aligned step cost
pub const STRAIGHT_COST: f64 = 1.0;

/// Diagonal step cost
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// Search parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of candidate paths requested
    pub k: usize,
    /// Maximum node expansions in a single iteration before giving up
    pub max_expansions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            k: 3,
            max_expansions: 200_000,
        }
    }
}

/// Open-set entry, ordered as a min-heap on `f` with ties broken by position
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f64,
    g: f64,
    pos: GridPos,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How a single A* iteration ended
#[derive(Clone, Debug, PartialEq)]
pub enum IterationOutcome {
    /// Goal reached; the path runs start to goal inclusive
    Found(Vec<GridPos>),
    /// Frontier emptied without reaching the goal
    Exhausted,
    /// Expansion cap hit
    CapReached,
}

/// State carried across the k iterations of one search call
pub struct SearchSession<'a, H: Heuristic + ?Sized> {
    map: &'a Map,
    heuristic: &'a H,
    start: GridPos,
    end: GridPos,
    max_expansions: usize,
    g_score_history: HashMap<GridPos, f64>,
    found_paths: Vec<Vec<GridPos>>,
}

impl<'a, H: Heuristic + ?Sized> SearchSession<'a, H> {
    /// Session over `map` with no paths found yet
    pub fn new(
        map: &'a Map,
        start: GridPos,
        end: GridPos,
        heuristic: &'a H,
        max_expansions: usize,
    ) -> Self {
        SearchSession {
            map,
            heuristic,
            start,
            end,
            max_expansions,
            g_score_history: HashMap::new(),
            found_paths: Vec::new(),
        }
    }

    /// Paths discovered so far, in discovery order
    pub fn found_paths(&self) -> &[Vec<GridPos>] {
        &self.found_paths
    }

    /// Interior nodes of every path found so far; the goal is never excluded
    fn excluded_nodes(&self) -> HashSet<GridPos> {
        self.found_paths
            .iter()
            .flat_map(|path| path[..path.len() - 1].iter().copied())
            .collect()
    }

    /// Run one A* iteration; a found path is recorded in the session
    pub fn next_path(&mut self) -> IterationOutcome {
        let excluded = self.excluded_nodes();

        let mut open = BinaryHeap::new();
        let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
        let mut g_score: HashMap<GridPos, f64> = HashMap::new();
        g_score.insert(self.start, 0.0);
        open.push(OpenNode {
            f: 0.0,
            g: 0.0,
            pos: self.start,
        });

        let mut expansions = 0usize;
        while let Some(current) = open.pop() {
            // Stale entry superseded by a cheaper push
            if g_score
                .get(&current.pos)
                .is_some_and(|&best| current.g > best)
            {
                continue;
            }

            if current.pos == self.end {
                let path = reconstruct_path(&came_from, self.start, self.end);
                debug!(
                    "[Search] iteration {} found path of {} nodes after {} expansions",
                    self.found_paths.len() + 1,
                    path.len(),
                    expansions
                );
                self.found_paths.push(path.clone());
                return IterationOutcome::Found(path);
            }

            if excluded.contains(&current.pos) {
                continue;
            }

            expansions += 1;
            if expansions > self.max_expansions {
                warn!(
                    "[Search] expansion cap of {} reached, abandoning iteration",
                    self.max_expansions
                );
                return IterationOutcome::CapReached;
            }

            for dx in -1..=1 {
                for dy in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }

                    let neighbor = current.pos.offset(dx, dy);
                    if self.map.is_collision(&neighbor.to_point()) {
                        continue;
                    }

                    let move_cost = if dx != 0 && dy != 0 {
                        DIAGONAL_COST
                    } else {
                        STRAIGHT_COST
                    };
                    let tentative_g = current.g + move_cost;

                    if tentative_g >= *g_score.get(&neighbor).unwrap_or(&f64::INFINITY) {
                        continue;
                    }
                    // Prune anything not strictly better than every earlier iteration
                    if tentative_g >= *self.g_score_history.get(&neighbor).unwrap_or(&f64::INFINITY)
                    {
                        continue;
                    }

                    self.g_score_history.insert(neighbor, tentative_g);
                    came_from.insert(neighbor, current.pos);
                    g_score.insert(neighbor, tentative_g);
                    open.push(OpenNode {
                        f: tentative_g + self.heuristic.estimate(neighbor, self.end),
                        g: tentative_g,
                        pos: neighbor,
                    });
                }
            }
        }

        trace!(
            "[Search] frontier exhausted after {} expansions",
            expansions
        );
        IterationOutcome::Exhausted
    }

    /// Iterate until `k` paths are found or no further path exists
    pub fn run(mut self, k: usize) -> Vec<Vec<GridPos>> {
        while self.found_paths.len() < k {
            match self.next_path() {
                IterationOutcome::Found(_) => {}
                IterationOutcome::Exhausted | IterationOutcome::CapReached => break,
            }
        }
        self.found_paths
    }
}

fn reconstruct_path(
    came_from: &HashMap<GridPos, GridPos>,
    start: GridPos,
    end: GridPos,
) -> Vec<GridPos> {
    let mut path = Vec::new();
    let mut node = end;
    while let Some(&parent) = came_from.get(&node) {
        path.push(node);
        node = parent;
    }
    path.push(start);
    path.reverse();
    path
}

/// Find up to `config.k` candidate paths from `start` to `end`, in discovery order.
///
/// Returns fewer than `k` paths (possibly none) when the exclusions leave no
/// route. `k == 0` returns immediately. Deterministic for identical inputs.
pub fn astar_search<H: Heuristic + ?Sized>(
    map: &Map,
    start: GridPos,
    end: GridPos,
    heuristic: &H,
    config: &SearchConfig,
) -> Vec<Vec<GridPos>> {
    if config.k == 0 {
        return Vec::new();
    }

    let paths = SearchSession::new(map, start, end, heuristic, config.max_expansions).run(config.k);
    debug!(
        "[Search] ({}, {}) -> ({}, {}): {} of {} requested paths",
        start.x,
        start.y,
        end.x,
        end.y,
        paths.len(),
        config.k
    );
    paths
}
