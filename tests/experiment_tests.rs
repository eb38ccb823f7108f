// tests/experiment_tests.rs
// Integration tests for the experiment runner and the CSV report.

#[cfg(test)]
mod tests {
    use mockall::mock;
    use std::path::Path;
    use synapse::analysis::reporting::COLUMNS;
    use synapse::analysis::{generate_report, ComplexityScorer};
    use synapse::experiment::{run_experiment_with, summarize};
    use synapse::navigation::PathMetrics;
    use synapse::{
        run_experiment, Agent, ExperimentConfig, Map, SearchConfig, Solution, SynapseError,
        WeightProfile,
    };

    mock! {
        pub Scorer {}
        impl ComplexityScorer for Scorer {
            fn average_complexity(&self, source: &Path) -> Result<f64, SynapseError>;
        }
    }

    /// Agent that never finds a route
    struct NoRouteAgent;

    impl Agent for NoRouteAgent {
        fn name(&self) -> &str {
            "NoRouteAgent"
        }

        fn solve(&self, _map: &Map) -> Solution {
            Solution {
                path: Vec::new(),
                metrics: PathMetrics::unusable(),
                score: f64::INFINITY,
                profile: WeightProfile::new(1.0, 0.0, 0.0),
                candidates: 0,
            }
        }
    }

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            num_scenarios: 5,
            random_seed: 11,
            search: SearchConfig {
                k: 2,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn runs_every_agent_on_every_scenario() {
        let mut scorer = MockScorer::new();
        scorer.expect_average_complexity().times(2).returning(|_| Ok(4.0));

        let results = run_experiment(&small_config(), &scorer).unwrap();
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.path_found));

        // 0.5 * 0.4 + 0.3 * 0.15 + 0.2 * 0.1
        for r in &results {
            assert!((r.srs - 0.265).abs() < 1e-9);
            let norm = r.normalized.expect("normalized after the run");
            for value in norm.values() {
                assert!((0.0..=1.0).contains(&value));
            }
            assert!(r.pps >= 0.0 && r.pps <= 1.0 + 1e-9);
        }

        let summaries = summarize(&results);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].agent, "StaticAgent");
        assert_eq!(summaries[1].agent, "SYNAPSEAgent");
        for summary in &summaries {
            assert_eq!(summary.runs, 5);
            assert_eq!(summary.paths_found, 5);
            assert_eq!(summary.mean_pps.len(), 3);
            assert!(summary.adaptability.is_some());
        }
    }

    #[test]
    fn failed_runs_score_zero_and_complexity_falls_back() {
        let mut scorer = MockScorer::new();
        scorer
            .expect_average_complexity()
            .times(1)
            .returning(|_| Err(SynapseError::IoError("missing".to_string())));

        let agents: Vec<Box<dyn Agent>> = vec![Box::new(NoRouteAgent)];
        let results = run_experiment_with(&small_config(), &agents, &scorer).unwrap();

        assert_eq!(results.len(), 5);
        for r in &results {
            assert!(!r.path_found);
            assert!(r.raw.is_unusable());
            assert_eq!(r.pps, 0.0);
            // Fallback complexity of 10
            assert!((r.srs - 0.565).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_gives_same_results() {
        let mut scorer = MockScorer::new();
        scorer.expect_average_complexity().returning(|_| Ok(2.0));

        let first = run_experiment(&small_config(), &scorer).unwrap();
        let second = run_experiment(&small_config(), &scorer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn report_has_header_and_one_row_per_run() {
        let mut scorer = MockScorer::new();
        scorer.expect_average_complexity().returning(|_| Ok(1.0));
        let results = run_experiment(&small_config(), &scorer).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let written = generate_report(&results, &out).unwrap().expect("report written");

        let name = written.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("experiment_results_") && name.ends_with(".csv"));

        let text = std::fs::read_to_string(&written).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), results.len());
        assert!(rows.iter().all(|row| row.split(',').count() == COLUMNS.len()));
    }

    #[test]
    fn empty_results_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate_report(&[], dir.path()).unwrap();
        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
