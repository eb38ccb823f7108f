// analysis/metrics.rs

// Cross-run aggregation: min-max normalisation of raw path metrics, the
// product performance score (PPS), the strategic risk score (SRS) of an
// agent's source, and the adaptability score between validation and holdout.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::navigation::PathMetrics;
use crate::SynapseError;

/// Complexity assumed when the source cannot be scored
pub const FALLBACK_COMPLEXITY: f64 = 10.0;

/// Test coverage used by the SRS until coverage is measured
pub const ASSUMED_TEST_COVERAGE: f64 = 0.85;

/// Regression potential used by the SRS until it is measured
pub const ASSUMED_REGRESSION_POTENTIAL: f64 = 0.1;

/// Weights of the product performance score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PpsWeights {
    /// Weight of normalised time
    pub time: f64,
    /// Weight of normalised energy
    pub energy: f64,
    /// Weight of normalised safety
    pub safety: f64,
    /// Weight of normalised payload integrity
    pub payload_integrity: f64,
}

impl Default for PpsWeights {
    fn default() -> Self {
        PpsWeights {
            time: 0.3,
            energy: 0.2,
            safety: 0.3,
            payload_integrity: 0.2,
        }
    }
}

/// Weights of the strategic risk score
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SrsWeights {
    /// Weight of average complexity / 10
    pub code_complexity: f64,
    /// Weight of the uncovered fraction
    pub test_coverage: f64,
    /// Weight of the regression potential
    pub regression_potential: f64,
}

impl Default for SrsWeights {
    fn default() -> Self {
        SrsWeights {
            code_complexity: 0.5,
            test_coverage: 0.3,
            regression_potential: 0.2,
        }
    }
}

/// Scores the average cyclomatic complexity of a source file
#[cfg_attr(test, mockall::automock)]
pub trait ComplexityScorer {
    /// Average complexity of the file at `source`
    fn average_complexity(&self, source: &Path) -> Result<f64, SynapseError>;
}

/// Approximate cyclomatic complexity of Rust source: one per function plus
/// one per branch keyword, match arm or short-circuit operator, averaged over
/// the functions in the file (zero when there are none)
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceComplexityScorer;

impl SourceComplexityScorer {
    /// Complexity of Rust source text
    pub fn score_source(&self, source: &str) -> f64 {
        let mut functions = 0usize;
        let mut decisions = 0usize;

        for line in source.lines() {
            let code = line.split("//").next().unwrap_or("");
            for word in code.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
                match word {
                    "fn" => functions += 1,
                    "if" | "while" | "for" => decisions += 1,
                    _ => {}
                }
            }
            decisions += code.matches("=>").count();
            decisions += code.matches("&&").count();
            decisions += code.matches("||").count();
        }

        if functions == 0 {
            return 0.0;
        }
        (functions + decisions) as f64 / functions as f64
    }
}

impl ComplexityScorer for SourceComplexityScorer {
    fn average_complexity(&self, source: &Path) -> Result<f64, SynapseError> {
        let text = fs::read_to_string(source).map_err(|e| {
            SynapseError::IoError(format!("Failed to read {}: {}", source.display(), e))
        })?;
        Ok(self.score_source(&text))
    }
}

/// Min-max normalise each field across all runs so that 1 is best.
///
/// A field with no spread normalises to 1. Infinite values (failed runs) are
/// left out of the range and normalise to 0.
pub fn normalize_results(runs: &[PathMetrics]) -> Vec<PathMetrics> {
    let mut ranges = [(f64::INFINITY, f64::NEG_INFINITY); 4];
    for run in runs {
        for (range, value) in ranges.iter_mut().zip(run.values()) {
            if value.is_finite() {
                range.0 = range.0.min(value);
                range.1 = range.1.max(value);
            }
        }
    }

    runs.iter()
        .map(|run| {
            let mut normalized = [0.0; 4];
            for ((slot, value), (min_v, max_v)) in
                normalized.iter_mut().zip(run.values()).zip(ranges)
            {
                *slot = if !value.is_finite() {
                    0.0
                } else if max_v - min_v == 0.0 {
                    1.0
                } else {
                    1.0 - (value - min_v) / (max_v - min_v)
                };
            }
            PathMetrics::from_values(normalized)
        })
        .collect()
}

/// Product performance score of one normalised run
pub fn calculate_pps(normalized: &PathMetrics, weights: &PpsWeights) -> f64 {
    let pps = weights.time * normalized.time
        + weights.energy * normalized.energy
        + weights.safety * normalized.safety
        + weights.payload_integrity * normalized.payload_integrity;
    debug!("Calculated PPS: {:.2}", pps);
    pps
}

/// Strategic risk score of the source at `source`
pub fn calculate_srs<S: ComplexityScorer + ?Sized>(
    scorer: &S,
    source: &Path,
    weights: &SrsWeights,
) -> f64 {
    let avg_complexity = scorer.average_complexity(source).unwrap_or_else(|e| {
        warn!("Complexity analysis failed ({}), assuming {}", e, FALLBACK_COMPLEXITY);
        FALLBACK_COMPLEXITY
    });

    let srs = weights.code_complexity * (avg_complexity / 10.0)
        + weights.test_coverage * (1.0 - ASSUMED_TEST_COVERAGE)
        + weights.regression_potential * ASSUMED_REGRESSION_POTENTIAL;
    debug!(
        "Calculated SRS: {:.2} (Complexity: {:.2})",
        srs, avg_complexity
    );
    srs
}

/// Relative PPS degradation from validation to holdout
pub fn calculate_adaptability(pps_validation: f64, pps_holdout: f64) -> f64 {
    if pps_validation == 0.0 {
        return 1.0;
    }
    (pps_validation - pps_holdout) / pps_validation
}
