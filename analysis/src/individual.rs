//! Actual vs expected connections of one individual with a focal segment.

use crate::aggregate::{reduce_to_in_out, rollup};
use crate::error::AnalysisError;
use crate::matrix::expected_weight;
use crate::stats::relative_percent_difference;
use interseg_core::{LookupError, SegmentLabel, SegmentedRecord, Weightedness};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndividualComparison {
    pub focal: SegmentLabel,
    /// Connection count or weight inside and outside the focal segment.
    pub actual: BTreeMap<SegmentLabel, f64>,
    pub focal_population: u64,
    pub population: u64,
    pub total_weight: f64,
    pub expected_weight: f64,
    /// Absolute RPD between actual and expected focal weight.
    pub rpd: f64,
}

/// Compares how much of an individual's connection weight lands in `focal`
/// with the share `focal` holds in the population.
///
/// `segmented` holds the individual's connections already mapped to segments.
pub fn actual_vs_expected(
    segmented: &[SegmentedRecord],
    focal: &str,
    weightedness: Weightedness,
    population_counts: &BTreeMap<SegmentLabel, u64>,
    population: u64,
) -> Result<IndividualComparison, AnalysisError> {
    if population == 0 {
        return Err(AnalysisError::EmptyPopulation);
    }
    let focal_population = population_counts
        .get(focal)
        .copied()
        .ok_or_else(|| LookupError::UnknownSegment(focal.to_string()))?;

    let actual = rollup(&reduce_to_in_out(segmented, focal), weightedness);
    let total_weight: f64 = actual.values().sum();
    let focal_actual = actual.get(focal).copied().unwrap_or_default();
    let expected = expected_weight(focal_population, population, total_weight);
    let rpd = relative_percent_difference(focal_actual, expected)?;
    debug!(
        "{} weight in {}: actual {} expected {}",
        weightedness, focal, focal_actual, expected
    );

    Ok(IndividualComparison {
        focal: focal.to_string(),
        actual,
        focal_population,
        population,
        total_weight,
        expected_weight: expected,
        rpd,
    })
}
