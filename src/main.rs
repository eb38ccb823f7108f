// src/main.rs
// Entry point for the SYNAPSE experiment: loads the configuration, runs both
// agents over the scenario suite and writes the CSV report.

use log::{info, warn};
use std::error::Error;
use std::path::PathBuf;

use synapse::analysis::{generate_report, SourceComplexityScorer};
use synapse::experiment::{run_experiment, summarize};
use synapse::ExperimentConfig;

const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Run the full experiment.
/// The optional first argument overrides the configuration path.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = if config_path.exists() {
        ExperimentConfig::load(&config_path)?
    } else {
        warn!(
            "{} not found, running with the default configuration",
            config_path.display()
        );
        ExperimentConfig::default()
    };

    info!("SYNAPSE Synthetic Experiment");
    let results = run_experiment(&config, &SourceComplexityScorer)?;

    for summary in summarize(&results) {
        info!(
            "{}: {}/{} paths found, mean PPS {:?}, adaptability {:?}",
            summary.agent, summary.paths_found, summary.runs, summary.mean_pps, summary.adaptability
        );
    }

    info!("Generating final report...");
    generate_report(&results, &config.output_dir)?;

    info!("Experiment finished.");
    Ok(())
}
