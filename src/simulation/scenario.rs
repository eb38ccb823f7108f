// simulation/scenario.rs

// Builds scenario maps from declarative parameters. The named layouts are
// deterministic; the scattered layout is reproducible from its seed.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{GridPos, Map, Point, Polygon};
use crate::SynapseError;

/// Thickness of walls and posts in the named layouts
const WALL_THICKNESS: f64 = 1.0;

/// Attempts per obstacle before the scattered layout gives up on it
const PLACEMENT_ATTEMPTS: usize = 20;

/// Minimum gap between a scattered obstacle and the start or end point
const ENDPOINT_CLEARANCE: f64 = 1.0;

/// Obstacle layout of a scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Two small blocks away from the diagonal
    LowRisk,
    /// Alternating walls forcing a long serpentine route
    HighRisk,
    /// A short dangerous corridor between a long safe route and a medium one
    Trap,
    /// `num_obstacles` random squares placed from the scenario seed
    Scattered,
}

/// Experiment split a scenario belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSet {
    /// Used while tuning
    Training,
    /// Checked before the holdout
    Validation,
    /// Unseen scenarios
    Holdout,
}

impl fmt::Display for ScenarioSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScenarioSet::Training => write!(f, "training"),
            ScenarioSet::Validation => write!(f, "validation"),
            ScenarioSet::Holdout => write!(f, "holdout"),
        }
    }
}

/// Declarative description of one scenario
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Unique scenario id
    pub id: String,
    /// Set the scenario belongs to
    pub set: ScenarioSet,
    /// Obstacle layout
    pub kind: ScenarioKind,
    /// Width and height
    pub dimensions: (u32, u32),
    /// Requested start cell
    pub start: (u32, u32),
    /// Requested goal cell
    pub end: (u32, u32),
    /// Obstacle count for the scattered layout
    pub num_obstacles: u32,
    /// Inclusive edge length range for scattered obstacles
    pub obstacle_size_range: (u32, u32),
    /// Seed for the scattered layout
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        ScenarioParams {
            id: "default".to_string(),
            set: ScenarioSet::Training,
            kind: ScenarioKind::LowRisk,
            dimensions: (50, 50),
            start: (5, 5),
            end: (45, 45),
            num_obstacles: 0,
            obstacle_size_range: (2, 5),
            seed: 0,
        }
    }
}

impl ScenarioParams {
    /// Whether this scenario is held out
    pub fn is_holdout(&self) -> bool {
        self.set == ScenarioSet::Holdout
    }
}

fn wall(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Polygon, SynapseError> {
    Polygon::rect(x0, y0, x1, y1)
}

fn trap_layout(w: f64, h: f64) -> Result<Vec<Polygon>, SynapseError> {
    let mut obstacles = Vec::new();
    let corridor_y = (h / 2.0).floor();

    // Middle route: short but lined with dense posts
    let mut x = 10.0;
    while x < w - 10.0 {
        obstacles.push(wall(x, corridor_y - 2.0, x + WALL_THICKNESS, corridor_y + 2.0)?);
        x += 2.0;
    }

    // Top route: medium length, sparse posts
    let mut x = 5.0;
    while x < w - 5.0 {
        obstacles.push(wall(x, 5.0, x + WALL_THICKNESS, 15.0)?);
        x += 8.0;
    }

    // Separators between the routes
    obstacles.push(wall(0.0, h - 20.0, w, h - 19.0)?);
    obstacles.push(wall(0.0, 20.0, w, 21.0)?);
    Ok(obstacles)
}

fn high_risk_layout(w: f64, h: f64) -> Result<Vec<Polygon>, SynapseError> {
    (0..w as u32)
        .step_by(8)
        .map(|i| {
            let x = i as f64;
            if i % 16 == 0 {
                wall(x, 0.0, x + WALL_THICKNESS, h - 10.0)
            } else {
                wall(x, 10.0, x + WALL_THICKNESS, h)
            }
        })
        .collect()
}

fn low_risk_layout() -> Result<Vec<Polygon>, SynapseError> {
    Ok(vec![
        wall(15.0, 15.0, 20.0, 20.0)?,
        wall(30.0, 30.0, 35.0, 35.0)?,
    ])
}

fn scattered_layout(
    params: &ScenarioParams,
    start: &Point,
    end: &Point,
) -> Result<Vec<Polygon>, SynapseError> {
    let (w, h) = (params.dimensions.0 as f64, params.dimensions.1 as f64);
    let (min_size, max_size) = params.obstacle_size_range;
    if min_size > max_size {
        return Err(SynapseError::InvalidMap(format!(
            "obstacle size range [{}, {}] is empty",
            min_size, max_size
        )));
    }
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut obstacles = Vec::with_capacity(params.num_obstacles as usize);

    for _ in 0..params.num_obstacles {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let size = rng.random_range(min_size..=max_size) as f64;
            if size >= w || size >= h {
                break;
            }
            let x = rng.random_range(0.0..w - size);
            let y = rng.random_range(0.0..h - size);
            let candidate = wall(x, y, x + size, y + size)?;
            if candidate.distance_to(start) > ENDPOINT_CLEARANCE
                && candidate.distance_to(end) > ENDPOINT_CLEARANCE
            {
                obstacles.push(candidate);
                break;
            }
        }
    }

    if obstacles.len() < params.num_obstacles as usize {
        debug!(
            "Placed {} of {} scattered obstacles",
            obstacles.len(),
            params.num_obstacles
        );
    }
    Ok(obstacles)
}

/// Build the map described by `params`
pub fn generate_scenario(params: &ScenarioParams) -> Result<Map, SynapseError> {
    let (w, h) = (params.dimensions.0 as f64, params.dimensions.1 as f64);
    let mut start = Point::new(params.start.0 as f64, params.start.1 as f64);
    let mut end = Point::new(params.end.0 as f64, params.end.1 as f64);

    info!(
        "Generating a {:?} {}x{} map for scenario '{}'",
        params.kind, params.dimensions.0, params.dimensions.1, params.id
    );

    let obstacles = match params.kind {
        ScenarioKind::Trap => {
            let mid = (h / 2.0).floor();
            start = Point::new(5.0, mid);
            end = Point::new(w - 5.0, mid);
            trap_layout(w, h)?
        }
        ScenarioKind::HighRisk => high_risk_layout(w, h)?,
        ScenarioKind::LowRisk => low_risk_layout()?,
        ScenarioKind::Scattered => scattered_layout(params, &start, &end)?,
    };

    let map = Map::new((w, h), obstacles, start, end)?;
    let start = free_endpoint(&map, map.start(), "start")?;
    let end = free_endpoint(&map, map.end(), "end")?;
    if start == map.start() && end == map.end() {
        return Ok(map);
    }
    Map::new((w, h), map.obstacles().to_vec(), start, end)
}

/// Nearest collision-free grid cell to `p` (ties go to the lowest cell), or
/// `p` itself when it is already free
fn nearest_free_cell(map: &Map, p: Point) -> Option<Point> {
    if !map.is_collision(&p) {
        return Some(p);
    }

    let (w, h) = map.dimensions();
    let origin = GridPos::from_point(&p);
    let max_radius = w.max(h).ceil() as i32;
    let mut best: Option<(f64, GridPos)> = None;

    for r in 1..=max_radius {
        // Every cell on ring r is at least r away
        if best.is_some_and(|(d, _)| (r as f64) > d) {
            break;
        }
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs().max(dy.abs()) != r {
                    continue;
                }
                let cell = origin.offset(dx, dy);
                if map.is_collision(&cell.to_point()) {
                    continue;
                }
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let closer = match best {
                    None => true,
                    Some((best_d, best_cell)) => d < best_d || (d == best_d && cell < best_cell),
                };
                if closer {
                    best = Some((d, cell));
                }
            }
        }
    }
    best.map(|(_, cell)| cell.to_point())
}

fn free_endpoint(map: &Map, p: Point, label: &str) -> Result<Point, SynapseError> {
    let free = nearest_free_cell(map, p).ok_or_else(|| {
        SynapseError::InvalidMap(format!("no free cell for the {} point", label))
    })?;
    if free != p {
        debug!(
            "Moved {} point from ({}, {}) to ({}, {}) out of an obstacle",
            label, p.x, p.y, free.x, free.y
        );
    }
    Ok(free)
}
