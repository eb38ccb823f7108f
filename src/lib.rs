//! SYNAPSE - risk-adaptive route selection experiment
//!
//! This library compares two route-selection policies on synthetic 2-D maps
//! with polygonal obstacles: a static agent with fixed scoring weights and the
//! SYNAPSE agent, which switches weights from a risk assessment of the map.
//! It provides the obstacle map, the multi-path grid search, path analysis,
//! the agents themselves, and the experiment harness around them.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Route-selection policies
pub mod agents;
/// Normalisation, scores and the CSV report
pub mod analysis;
/// Geometry primitives and the obstacle map
pub mod core;
/// Experiment runner
pub mod experiment;
/// Multi-path search, heuristics and path analysis
pub mod navigation;
/// Scenario and suite generation
pub mod simulation;

// Re-export commonly used items for easier access
pub use agents::{Agent, Solution, StaticAgent, SynapseAgent, WeightProfile};
pub use crate::core::{GridPos, Map, Point, Polygon};
pub use experiment::{run_experiment, RunResult};
pub use navigation::{analyze_path, astar_search, PathMetrics, SearchConfig};
pub use simulation::{generate_scenario, ScenarioKind, ScenarioParams};

use analysis::{PpsWeights, SrsWeights};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Main configuration structure for an experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Total number of scenarios across all sets
    pub num_scenarios: usize,
    /// Seed for the scenario suite
    pub random_seed: u64,
    /// Scenario suite parameters
    pub scenario_generation: ScenarioGenerationConfig,
    /// Weights of the strategic risk score
    pub srs_weights: SrsWeights,
    /// Weights of the product performance score
    pub final_pps_weights: PpsWeights,
    /// Candidate search parameters shared by both agents
    pub search: SearchConfig,
    /// Directory the CSV report is written to
    pub output_dir: PathBuf,
    /// Directory holding the agent sources scored for SRS
    pub agent_source_dir: PathBuf,
}

/// Scenario suite parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioGenerationConfig {
    /// Fractions of scenarios per set
    pub split: SplitConfig,
    /// Map width and height range (max exclusive)
    pub dimensions: RangeConfig,
    /// Obstacle count range (max exclusive)
    pub num_obstacles: RangeConfig,
    /// Obstacle edge length range (inclusive)
    pub obstacle_size: RangeConfig,
    /// Layout applied to every generated scenario
    pub layout: ScenarioKind,
}

/// Set fractions. Holdout must equal what training and validation leave;
/// its count is always the remainder after flooring the other two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Training fraction
    pub training: f64,
    /// Validation fraction
    pub validation: f64,
    /// Holdout fraction
    pub holdout: f64,
}

/// Integer range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Lower bound
    pub min: u32,
    /// Upper bound
    pub max: u32,
}

/// Slack allowed when checking that the split fractions sum to one
pub const SPLIT_TOLERANCE: f64 = 1e-6;

/// Smallest map edge for which endpoint placement leaves room on both sides
pub const MIN_MAP_DIMENSION: u32 = 24;

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            num_scenarios: 20,
            random_seed: 42,
            scenario_generation: ScenarioGenerationConfig::default(),
            srs_weights: SrsWeights::default(),
            final_pps_weights: PpsWeights::default(),
            search: SearchConfig::default(),
            output_dir: PathBuf::from("results"),
            agent_source_dir: PathBuf::from("src/agents"),
        }
    }
}

impl Default for ScenarioGenerationConfig {
    fn default() -> Self {
        ScenarioGenerationConfig {
            split: SplitConfig {
                training: 0.6,
                validation: 0.2,
                holdout: 0.2,
            },
            dimensions: RangeConfig { min: 50, max: 60 },
            num_obstacles: RangeConfig { min: 5, max: 15 },
            obstacle_size: RangeConfig { min: 2, max: 6 },
            layout: ScenarioKind::LowRisk,
        }
    }
}

impl ExperimentConfig {
    /// Load and validate a YAML configuration file
    pub fn load(path: &Path) -> Result<Self, SynapseError> {
        let file = File::open(path).map_err(|e| {
            SynapseError::ConfigError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let config: ExperimentConfig = serde_yaml::from_reader(file).map_err(|e| {
            SynapseError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the suite generator cannot sample from
    pub fn validate(&self) -> Result<(), SynapseError> {
        let generation = &self.scenario_generation;
        let split = &generation.split;

        if split.training < 0.0
            || split.validation < 0.0
            || split.training + split.validation > 1.0
        {
            return Err(SynapseError::ConfigError(format!(
                "invalid split: training {} + validation {} must lie within [0, 1]",
                split.training, split.validation
            )));
        }
        let remainder = 1.0 - split.training - split.validation;
        if (split.holdout - remainder).abs() > SPLIT_TOLERANCE {
            return Err(SynapseError::ConfigError(format!(
                "invalid split: holdout {} must equal the remaining {:.4}",
                split.holdout, remainder
            )));
        }
        if generation.dimensions.min < MIN_MAP_DIMENSION
            || generation.dimensions.min >= generation.dimensions.max
        {
            return Err(SynapseError::ConfigError(format!(
                "dimensions must satisfy {} <= min < max, got [{}, {})",
                MIN_MAP_DIMENSION, generation.dimensions.min, generation.dimensions.max
            )));
        }
        if generation.num_obstacles.min >= generation.num_obstacles.max {
            return Err(SynapseError::ConfigError(format!(
                "num_obstacles range [{}, {}) is empty",
                generation.num_obstacles.min, generation.num_obstacles.max
            )));
        }
        if generation.obstacle_size.min == 0
            || generation.obstacle_size.min > generation.obstacle_size.max
        {
            return Err(SynapseError::ConfigError(format!(
                "obstacle_size range [{}, {}] is invalid",
                generation.obstacle_size.min, generation.obstacle_size.max
            )));
        }
        Ok(())
    }
}

/// SYNAPSE error types
#[derive(Debug)]
pub enum SynapseError {
    /// Map or polygon failed construction checks
    InvalidMap(String),
    /// Configuration could not be loaded or is inconsistent
    ConfigError(String),
    /// File system error
    IoError(String),
    /// Report could not be written
    ReportError(String),
}

impl std::fmt::Display for SynapseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SynapseError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
            SynapseError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SynapseError::IoError(msg) => write!(f, "I/O error: {}", msg),
            SynapseError::ReportError(msg) => write!(f, "Report error: {}", msg),
        }
    }
}

impl std::error::Error for SynapseError {}
