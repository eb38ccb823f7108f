// analysis/reporting.rs

// Flattens experiment results into a timestamped CSV file.

use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::experiment::RunResult;
use crate::navigation::PathMetrics;
use crate::SynapseError;

/// Report columns, in order
pub const COLUMNS: [&str; 14] = [
    "scenario_id",
    "scenario_type",
    "agent",
    "pps",
    "srs",
    "path_found",
    "norm_time",
    "norm_energy",
    "norm_safety",
    "norm_payload_integrity",
    "raw_time",
    "raw_energy",
    "raw_safety",
    "raw_payload_integrity",
];

fn push_metrics(line: &mut String, metrics: Option<&PathMetrics>) {
    for value in metrics.map(PathMetrics::values).unwrap_or([f64::NAN; 4]) {
        if value.is_nan() {
            line.push(',');
        } else {
            let _ = write!(line, ",{:.4}", value);
        }
    }
}

/// Render results as CSV text, header included
pub fn render_csv(results: &[RunResult]) -> String {
    let mut out = COLUMNS.join(",");
    out.push('\n');

    for row in results {
        let mut line = String::new();
        let _ = write!(
            line,
            "{},{},{},{:.4},{:.4},{}",
            row.scenario_id, row.scenario_set, row.agent, row.pps, row.srs, row.path_found
        );
        push_metrics(&mut line, row.normalized.as_ref());
        push_metrics(&mut line, Some(&row.raw));
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Write `experiment_results_<unix-seconds>.csv` under `output_dir`.
///
/// Returns the file written, or `None` when there is nothing to report.
pub fn generate_report(
    results: &[RunResult],
    output_dir: &Path,
) -> Result<Option<PathBuf>, SynapseError> {
    if results.is_empty() {
        info!("No data to generate report.");
        return Ok(None);
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        SynapseError::ReportError(format!(
            "Failed to create {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let filename = output_dir.join(format!("experiment_results_{}.csv", timestamp));

    fs::write(&filename, render_csv(results)).map_err(|e| {
        SynapseError::ReportError(format!("Failed to write {}: {}", filename.display(), e))
    })?;

    info!("Report successfully generated: {}", filename.display());
    Ok(Some(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ScenarioSet;

    fn sample(found: bool) -> RunResult {
        let raw = if found {
            PathMetrics {
                time: 42.5,
                energy: 42.5,
                safety: 3.0,
                payload_integrity: 1.0,
            }
        } else {
            PathMetrics::unusable()
        };
        RunResult {
            scenario_id: "holdout_1".to_string(),
            scenario_set: ScenarioSet::Holdout,
            agent: "StaticAgent".to_string(),
            path_found: found,
            path: Vec::new(),
            raw,
            normalized: Some(PathMetrics::from_values([1.0, 1.0, 0.5, 0.0])),
            srs: 0.25,
            pps: 0.75,
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let csv = render_csv(&[sample(true), sample(false)]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], COLUMNS.join(","));
        assert_eq!(
            lines[1],
            "holdout_1,holdout,StaticAgent,0.7500,0.2500,true,1.0000,1.0000,0.5000,0.0000,42.5000,42.5000,3.0000,1.0000"
        );
        assert!(lines[2].ends_with(",false,1.0000,1.0000,0.5000,0.0000,inf,inf,inf,inf"));
    }

    #[test]
    fn writes_file_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let written = generate_report(&[sample(true)], &out).unwrap().unwrap();
        assert!(written.starts_with(&out));
        let text = fs::read_to_string(&written).unwrap();
        assert!(text.starts_with("scenario_id,"));
    }

    #[test]
    fn empty_results_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(generate_report(&[], dir.path()).unwrap(), None);
    }
}
