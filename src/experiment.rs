// src/experiment.rs
// Runs every agent over the generated scenario suite and scores the results.

use log::info;
use serde::Serialize;
use std::collections::HashMap;

use crate::agents::{Agent, StaticAgent, SynapseAgent};
use crate::analysis::{
    calculate_adaptability, calculate_pps, calculate_srs, normalize_results, ComplexityScorer,
};
use crate::core::Point;
use crate::navigation::PathMetrics;
use crate::simulation::{generate_experiment_suite, generate_scenario, ScenarioParams, ScenarioSet};
use crate::{ExperimentConfig, SynapseError};

/// One agent's outcome on one scenario
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunResult {
    /// Scenario the run belongs to
    pub scenario_id: String,
    /// Set of that scenario
    pub scenario_set: ScenarioSet,
    /// Agent name
    pub agent: String,
    /// Whether the agent returned a usable route
    pub path_found: bool,
    /// Selected route, empty when none
    pub path: Vec<Point>,
    /// Raw metrics of the route
    pub raw: PathMetrics,
    /// Filled in once every run is known
    pub normalized: Option<PathMetrics>,
    /// Strategic risk score of the agent
    pub srs: f64,
    /// Product performance score of this run
    pub pps: f64,
}

/// Per-agent aggregate over the experiment
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentSummary {
    /// Agent name
    pub agent: String,
    /// Runs recorded
    pub runs: usize,
    /// Runs with a usable route
    pub paths_found: usize,
    /// Mean PPS per scenario set
    pub mean_pps: HashMap<String, f64>,
    /// PPS degradation from validation to holdout, when both sets ran
    pub adaptability: Option<f64>,
}

/// Source file of an agent, e.g. `StaticAgent` -> `static_agent.rs`
pub fn agent_source_file(agent: &str) -> String {
    format!("{}.rs", agent.to_lowercase().replace("agent", "_agent"))
}

/// Build the scenario map and let every agent solve it
pub fn run_single_scenario(
    params: &ScenarioParams,
    agents: &[Box<dyn Agent>],
) -> Result<Vec<RunResult>, SynapseError> {
    info!("  Running Scenario: {}...", params.id);
    let map = generate_scenario(params)?;

    Ok(agents
        .iter()
        .map(|agent| {
            let solution = agent.solve(&map);
            RunResult {
                scenario_id: params.id.clone(),
                scenario_set: params.set,
                agent: agent.name().to_string(),
                path_found: solution.found(),
                path: solution.path,
                raw: solution.metrics,
                normalized: None,
                srs: 0.0,
                pps: 0.0,
            }
        })
        .collect())
}

/// Run `agents` over the configured suite, then normalise and score
pub fn run_experiment_with(
    config: &ExperimentConfig,
    agents: &[Box<dyn Agent>],
    scorer: &dyn ComplexityScorer,
) -> Result<Vec<RunResult>, SynapseError> {
    info!("Phase 1: Generating scenario suite...");
    let scenarios = generate_experiment_suite(config);

    info!("Phase 2: Running all scenarios...");
    let mut results = Vec::with_capacity(scenarios.len() * agents.len());
    for params in &scenarios {
        results.extend(run_single_scenario(params, agents)?);
    }
    info!("All scenarios complete.");

    info!("Phase 3: Calculating SRS and normalizing results...");
    let raw: Vec<PathMetrics> = results.iter().map(|r| r.raw).collect();
    let normalized = normalize_results(&raw);

    let srs_by_agent: HashMap<&str, f64> = agents
        .iter()
        .map(|agent| {
            let source = config.agent_source_dir.join(agent_source_file(agent.name()));
            (agent.name(), calculate_srs(scorer, &source, &config.srs_weights))
        })
        .collect();

    info!("Phase 4: Calculating final PPS...");
    for (result, norm) in results.iter_mut().zip(normalized) {
        result.srs = srs_by_agent.get(result.agent.as_str()).copied().unwrap_or(0.0);
        result.pps = calculate_pps(&norm, &config.final_pps_weights);
        result.normalized = Some(norm);
    }

    Ok(results)
}

/// Run the static and SYNAPSE agents over the configured suite
pub fn run_experiment(
    config: &ExperimentConfig,
    scorer: &dyn ComplexityScorer,
) -> Result<Vec<RunResult>, SynapseError> {
    let agents: Vec<Box<dyn Agent>> = vec![
        Box::new(StaticAgent::new(config.search.clone())),
        Box::new(SynapseAgent::new(config.search.clone())),
    ];
    run_experiment_with(config, &agents, scorer)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Aggregate results per agent, in first-seen order
pub fn summarize(results: &[RunResult]) -> Vec<AgentSummary> {
    let mut order: Vec<&str> = Vec::new();
    for r in results {
        if !order.contains(&r.agent.as_str()) {
            order.push(&r.agent);
        }
    }

    order
        .into_iter()
        .map(|agent| {
            let runs: Vec<&RunResult> = results.iter().filter(|r| r.agent == agent).collect();
            let pps_of = |set: ScenarioSet| -> Vec<f64> {
                runs.iter()
                    .filter(|r| r.scenario_set == set)
                    .map(|r| r.pps)
                    .collect()
            };

            let mut mean_pps = HashMap::new();
            for set in [ScenarioSet::Training, ScenarioSet::Validation, ScenarioSet::Holdout] {
                if let Some(m) = mean(&pps_of(set)) {
                    mean_pps.insert(set.to_string(), m);
                }
            }

            let adaptability = match (
                mean(&pps_of(ScenarioSet::Validation)),
                mean(&pps_of(ScenarioSet::Holdout)),
            ) {
                (Some(validation), Some(holdout)) => {
                    Some(calculate_adaptability(validation, holdout))
                }
                _ => None,
            };

            AgentSummary {
                agent: agent.to_string(),
                runs: runs.len(),
                paths_found: runs.iter().filter(|r| r.path_found).count(),
                mean_pps,
                adaptability,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_file_names() {
        assert_eq!(agent_source_file("StaticAgent"), "static_agent.rs");
        assert_eq!(agent_source_file("SYNAPSEAgent"), "synapse_agent.rs");
    }

    #[test]
    fn single_low_risk_scenario() {
        let agents: Vec<Box<dyn Agent>> =
            vec![Box::new(StaticAgent::default()), Box::new(SynapseAgent::default())];
        let results = run_single_scenario(&ScenarioParams::default(), &agents).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.path_found && r.raw.time.is_finite()));
        assert_eq!(results[1].agent, "SYNAPSEAgent");
    }
}
