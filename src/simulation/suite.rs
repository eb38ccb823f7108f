// simulation/suite.rs

// Draws the scenario suite for one experiment from the seeded configuration.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::scenario::{ScenarioParams, ScenarioSet};
use crate::ExperimentConfig;

/// Scenario counts per set: training and validation are floored fractions,
/// holdout takes the remainder
pub fn split_counts(config: &ExperimentConfig) -> [(ScenarioSet, usize); 3] {
    let n = config.num_scenarios;
    let split = &config.scenario_generation.split;
    let training = (n as f64 * split.training) as usize;
    let validation = (n as f64 * split.validation) as usize;
    let holdout = n.saturating_sub(training + validation);
    [
        (ScenarioSet::Training, training),
        (ScenarioSet::Validation, validation),
        (ScenarioSet::Holdout, holdout),
    ]
}

/// Generate every scenario of the experiment. Same seed, same suite.
pub fn generate_experiment_suite(config: &ExperimentConfig) -> Vec<ScenarioParams> {
    let generation = &config.scenario_generation;
    let mut rng = StdRng::seed_from_u64(config.random_seed);
    let mut scenarios = Vec::with_capacity(config.num_scenarios);

    for (set, count) in split_counts(config) {
        for i in 0..count {
            let w = rng.random_range(generation.dimensions.min..generation.dimensions.max);
            let h = rng.random_range(generation.dimensions.min..generation.dimensions.max);

            // Keep the endpoints away from the edges
            let start = (rng.random_range(5..w / 4), rng.random_range(5..h / 4));
            let end = (
                rng.random_range(w * 3 / 4..w - 5),
                rng.random_range(h * 3 / 4..h - 5),
            );

            scenarios.push(ScenarioParams {
                id: format!("{}_{}", set, i + 1),
                set,
                kind: generation.layout,
                dimensions: (w, h),
                start,
                end,
                num_obstacles: rng.random_range(generation.num_obstacles.min..generation.num_obstacles.max),
                obstacle_size_range: (generation.obstacle_size.min, generation.obstacle_size.max),
                seed: rng.random(),
            });
        }
    }

    info!("Generated {} scenarios.", scenarios.len());
    scenarios
}
