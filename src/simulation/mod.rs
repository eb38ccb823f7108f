//! Scenario generation for SYNAPSE experiments
//!
//! Turns the experiment configuration into a reproducible suite of scenario
//! parameters and builds the obstacle map for each scenario.

/// Single-scenario map generation
pub mod scenario;
/// Seeded experiment suites
pub mod suite;

pub use scenario::{generate_scenario, ScenarioKind, ScenarioParams, ScenarioSet};
pub use suite::{generate_experiment_suite, split_counts};
