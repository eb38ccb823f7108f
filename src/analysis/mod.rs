//! Result aggregation and reporting
//!
//! Normalises raw metrics across runs, derives the PPS, SRS and adaptability
//! scores, and writes the flattened CSV report.

/// Normalisation and PPS/SRS scores
pub mod metrics;
/// CSV report
pub mod reporting;

pub use metrics::{
    calculate_adaptability, calculate_pps, calculate_srs, normalize_results, ComplexityScorer,
    PpsWeights, SourceComplexityScorer, SrsWeights,
};
pub use reporting::{generate_report, render_csv};
