//! Segment-by-segment matrices of actual-vs-expected deviation and
//! pairwise distribution divergence.

use crate::aggregate::{vertex_totals, SegmentDistribution};
use crate::error::AnalysisError;
use crate::stats::{is_testable, pairwise_ks, signed_relative_percent_difference, KsComparison};
use interseg_core::config::AnalysisConfig;
use interseg_core::{LookupError, SegmentLabel, SegmentedEdge};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Square matrix indexed by sorted segment labels.
///
/// `values[row][column]`; for deviation matrices the row is the destination
/// segment and the column is the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentMatrix {
    labels: Vec<SegmentLabel>,
    values: Vec<Vec<f64>>,
}

impl SegmentMatrix {
    pub fn new(labels: Vec<SegmentLabel>) -> Self {
        Self::filled(labels, 0.0)
    }

    /// Labels are sorted and deduplicated.
    pub fn filled(mut labels: Vec<SegmentLabel>, value: f64) -> Self {
        labels.sort();
        labels.dedup();
        let size = labels.len();
        Self {
            labels,
            values: vec![vec![value; size]; size],
        }
    }

    pub fn labels(&self) -> &[SegmentLabel] {
        &self.labels
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|probe| probe.as_str().cmp(label))
            .ok()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let row = self.index_of(row)?;
        let column = self.index_of(column)?;
        Some(self.values[row][column])
    }

    /// Overwrites a cell. Unknown labels are a lookup error.
    pub fn set(&mut self, row: &str, column: &str, value: f64) -> Result<(), LookupError> {
        let row = self
            .index_of(row)
            .ok_or_else(|| LookupError::UnknownSegment(row.to_string()))?;
        let column = self
            .index_of(column)
            .ok_or_else(|| LookupError::UnknownSegment(column.to_string()))?;
        self.values[row][column] = value;
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&SegmentLabel, &[f64])> {
        self.labels
            .iter()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn diagonal(&self) -> Vec<LabelledValue> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| LabelledValue {
                label: label.clone(),
                value: self.values[idx][idx],
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledValue {
    pub label: SegmentLabel,
    pub value: f64,
}

/// Full matrix, or only its diagonal when there are too many segments to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "data", rename_all = "snake_case")]
pub enum MatrixOutput {
    Matrix(SegmentMatrix),
    Diagonal(Vec<LabelledValue>),
}

/// Weight `source` would send to `destination` if its connections were spread
/// in proportion to population share.
pub fn expected_weight(destination_population: u64, total_population: u64, source_total: f64) -> f64 {
    destination_population as f64 / total_population as f64 * source_total
}

/// Builds the signed RPD matrix of actual against expected edge weight.
///
/// `population_counts` fixes the label set; every edge endpoint must be one of
/// its labels. Above `display_threshold` labels only the diagonal is returned,
/// sorted by magnitude.
pub fn rpd_matrix(
    edges: &[SegmentedEdge],
    population_counts: &BTreeMap<SegmentLabel, u64>,
    display_threshold: usize,
) -> Result<MatrixOutput, AnalysisError> {
    let total_population: u64 = population_counts.values().sum();
    if total_population == 0 {
        return Err(AnalysisError::EmptyPopulation);
    }
    let population = |label: &str| {
        population_counts
            .get(label)
            .copied()
            .ok_or_else(|| LookupError::UnknownSegment(label.to_string()))
    };

    let totals = vertex_totals(edges);
    let mut matrix = SegmentMatrix::new(population_counts.keys().cloned().collect());

    for edge in edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        let source_total = totals.get(source).copied().unwrap_or_default();
        let expected = expected_weight(population(target)?, total_population, source_total);
        let deviation = signed_relative_percent_difference(edge.weight, expected)?;
        matrix.set(target, source, deviation)?;

        if source != target {
            let target_total = totals.get(target).copied().unwrap_or_default();
            let expected = expected_weight(population(source)?, total_population, target_total);
            let deviation = signed_relative_percent_difference(edge.weight, expected)?;
            matrix.set(source, target, deviation)?;
        }
    }

    if matrix.size() > display_threshold {
        info!(
            "{} segments exceed display threshold {}, reporting diagonal",
            matrix.size(),
            display_threshold
        );
        let mut diagonal = matrix.diagonal();
        diagonal.sort_by(|a, b| {
            b.value
                .abs()
                .total_cmp(&a.value.abs())
                .then_with(|| a.label.cmp(&b.label))
        });
        return Ok(MatrixOutput::Diagonal(diagonal));
    }

    info!("built {}x{} deviation matrix", matrix.size(), matrix.size());
    Ok(MatrixOutput::Matrix(matrix))
}

#[derive(Debug, Clone, PartialEq)]
pub struct KsMatrixOptions {
    pub min_sample_size: usize,
    pub significance: f64,
    pub display_threshold: usize,
    pub top_pairs: usize,
}

impl KsMatrixOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            min_sample_size: config.min_sample_size,
            significance: config.significance,
            display_threshold: config.display_threshold,
            top_pairs: config.top_pairs,
        }
    }
}

impl Default for KsMatrixOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsMatrix {
    /// KS statistic, filled only for pairs significant at the chosen level.
    pub statistic: SegmentMatrix,
    /// p-value per tested pair; untested cells stay at 1.
    pub p_values: SegmentMatrix,
    pub comparisons: Vec<KsComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "data", rename_all = "snake_case")]
pub enum KsOutput {
    Matrix(KsMatrix),
    TopPairs(Vec<KsComparison>),
}

pub fn ks_matrix(
    distribution: &SegmentDistribution,
    options: &KsMatrixOptions,
) -> Result<KsOutput, AnalysisError> {
    let comparisons = pairwise_ks(distribution, options.min_sample_size)?;
    let labels: Vec<SegmentLabel> = distribution
        .iter()
        .filter(|(_, values)| is_testable(values, options.min_sample_size))
        .map(|(label, _)| label.clone())
        .collect();

    if labels.len() > options.display_threshold {
        let mut significant: Vec<KsComparison> = comparisons
            .into_iter()
            .filter(|c| c.p_value <= options.significance)
            .collect();
        significant.sort_by(|a, b| {
            b.statistic
                .total_cmp(&a.statistic)
                .then_with(|| (&a.left, &a.right).cmp(&(&b.left, &b.right)))
        });
        significant.truncate(options.top_pairs);
        info!(
            "{} segments exceed display threshold {}, reporting {} top pairs",
            labels.len(),
            options.display_threshold,
            significant.len()
        );
        return Ok(KsOutput::TopPairs(significant));
    }

    let mut statistic = SegmentMatrix::new(labels.clone());
    let mut p_values = SegmentMatrix::filled(labels, 1.0);
    for comparison in &comparisons {
        let (left, right) = (comparison.left.as_str(), comparison.right.as_str());
        p_values.set(left, right, comparison.p_value)?;
        p_values.set(right, left, comparison.p_value)?;
        if comparison.p_value <= options.significance {
            statistic.set(left, right, comparison.statistic)?;
            statistic.set(right, left, comparison.statistic)?;
        }
    }
    info!(
        "built {}x{} KS matrix from {} comparisons",
        statistic.size(),
        statistic.size(),
        comparisons.len()
    );
    Ok(KsOutput::Matrix(KsMatrix {
        statistic,
        p_values,
        comparisons,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use interseg_core::Edge;

    fn edge(source: &str, target: &str, weight: f64) -> SegmentedEdge {
        Edge::new(source.to_string(), target.to_string(), weight)
    }

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<SegmentLabel, u64> {
        pairs.iter().map(|(label, n)| (label.to_string(), *n)).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_expected_weight() {
        assert!(close(expected_weight(20, 30, 5.0), 20.0 / 30.0 * 5.0));
        assert_eq!(expected_weight(0, 30, 5.0), 0.0);
    }

    #[test]
    fn test_rpd_matrix_two_segments() {
        let output = rpd_matrix(&[edge("X", "Y", 5.0)], &counts(&[("X", 10), ("Y", 20)]), 50).unwrap();
        let MatrixOutput::Matrix(matrix) = output else {
            panic!("expected full matrix");
        };
        assert_eq!(matrix.labels(), ["X".to_string(), "Y".to_string()]);
        assert!(close(matrix.get("Y", "X").unwrap(), 0.4));
        assert!(close(matrix.get("X", "Y").unwrap(), 1.0));
        assert_eq!(matrix.get("X", "X"), Some(0.0));
        assert_eq!(matrix.get("Y", "Y"), Some(0.0));
    }

    #[test]
    fn test_rpd_matrix_self_edge_fills_diagonal_only() {
        let output = rpd_matrix(&[edge("X", "X", 4.0)], &counts(&[("X", 1), ("Y", 3)]), 50).unwrap();
        let MatrixOutput::Matrix(matrix) = output else {
            panic!("expected full matrix");
        };
        // expected = 1/4 * 4 = 1, rpd(4, 1) = 1.2
        assert!(close(matrix.get("X", "X").unwrap(), 1.2));
        assert_eq!(matrix.get("X", "Y"), Some(0.0));
        assert_eq!(matrix.get("Y", "X"), Some(0.0));
    }

    #[test]
    fn test_rpd_matrix_sign_shows_deficit() {
        let output = rpd_matrix(
            &[edge("X", "X", 1.0), edge("X", "Y", 9.0)],
            &counts(&[("X", 1), ("Y", 1)]),
            50,
        )
        .unwrap();
        let MatrixOutput::Matrix(matrix) = output else {
            panic!("expected full matrix");
        };
        // total(X) = 10, expected X->X = 5
        assert!(matrix.get("X", "X").unwrap() < 0.0);
        assert!(matrix.get("Y", "X").unwrap() > 0.0);
    }

    #[test]
    fn test_rpd_matrix_degrades_to_sorted_diagonal() {
        let edges = vec![edge("A", "A", 6.0), edge("B", "B", 6.0), edge("C", "C", 6.0)];
        let output = rpd_matrix(&edges, &counts(&[("A", 3), ("B", 2), ("C", 1)]), 2).unwrap();
        let MatrixOutput::Diagonal(diagonal) = output else {
            panic!("expected diagonal");
        };
        let labels: Vec<&str> = diagonal.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "B", "A"]);
        assert!(close(diagonal[0].value, 10.0 / 7.0));
        assert!(close(diagonal[1].value, 1.0));
        assert!(close(diagonal[2].value, 2.0 / 3.0));
    }

    #[test]
    fn test_rpd_matrix_errors() {
        let population = counts(&[("X", 1)]);
        assert_eq!(
            rpd_matrix(&[edge("X", "Z", 1.0)], &population, 50).unwrap_err(),
            AnalysisError::Lookup(LookupError::UnknownSegment("Z".into()))
        );
        assert_eq!(
            rpd_matrix(&[], &BTreeMap::new(), 50).unwrap_err(),
            AnalysisError::EmptyPopulation
        );
    }

    #[test]
    fn test_matrix_output_json_shape() {
        let output = rpd_matrix(&[edge("X", "Y", 5.0)], &counts(&[("X", 10), ("Y", 20)]), 50).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["mode"], "matrix");
        assert_eq!(json["data"]["labels"], serde_json::json!(["X", "Y"]));
        assert_eq!(json["data"]["values"].as_array().unwrap().len(), 2);
    }

    fn spread(start: f64, len: usize) -> Vec<f64> {
        (0..len).map(|i| start + i as f64).collect()
    }

    #[test]
    fn test_ks_matrix_fills_significant_cells() {
        let distribution: SegmentDistribution = BTreeMap::from([
            ("A".to_string(), spread(0.0, 40)),
            ("B".to_string(), spread(0.5, 40)),
            ("C".to_string(), spread(1000.0, 40)),
        ]);
        let options = KsMatrixOptions {
            min_sample_size: 10,
            ..KsMatrixOptions::default()
        };
        let KsOutput::Matrix(result) = ks_matrix(&distribution, &options).unwrap() else {
            panic!("expected matrix");
        };
        assert_eq!(result.comparisons.len(), 3);
        assert_eq!(result.statistic.get("A", "B"), Some(0.0));
        assert_eq!(result.statistic.get("A", "C"), Some(1.0));
        assert_eq!(result.statistic.get("C", "A"), Some(1.0));
        assert!(result.p_values.get("A", "B").unwrap() > 0.05);
        assert_eq!(result.p_values.get("A", "A"), Some(1.0));
    }

    #[test]
    fn test_ks_matrix_leaves_out_small_segments() {
        let distribution: SegmentDistribution = BTreeMap::from([
            ("A".to_string(), spread(0.0, 40)),
            ("B".to_string(), spread(1000.0, 40)),
            ("tiny".to_string(), vec![3.0]),
            ("empty".to_string(), Vec::new()),
        ]);
        let options = KsMatrixOptions {
            min_sample_size: 10,
            ..KsMatrixOptions::default()
        };
        let KsOutput::Matrix(result) = ks_matrix(&distribution, &options).unwrap() else {
            panic!("expected matrix");
        };
        assert_eq!(result.statistic.labels(), ["A", "B"]);
        assert_eq!(result.p_values.labels(), ["A", "B"]);
        assert_eq!(result.statistic.get("A", "tiny"), None);
        assert_eq!(result.statistic.get("A", "B"), Some(1.0));
    }

    #[test]
    fn test_ks_display_threshold_counts_testable_segments_only() {
        let mut distribution: SegmentDistribution = BTreeMap::from([
            ("A".to_string(), spread(0.0, 40)),
            ("B".to_string(), spread(1000.0, 40)),
        ]);
        for idx in 0..60 {
            distribution.insert(format!("small{:02}", idx), vec![idx as f64]);
        }
        let options = KsMatrixOptions {
            min_sample_size: 10,
            display_threshold: 50,
            ..KsMatrixOptions::default()
        };
        let KsOutput::Matrix(result) = ks_matrix(&distribution, &options).unwrap() else {
            panic!("expected matrix");
        };
        assert_eq!(result.statistic.size(), 2);
    }

    #[test]
    fn test_ks_matrix_top_pairs() {
        let distribution: SegmentDistribution = BTreeMap::from([
            ("A".to_string(), spread(0.0, 40)),
            ("B".to_string(), spread(20.0, 40)),
            ("C".to_string(), spread(1000.0, 40)),
        ]);
        let options = KsMatrixOptions {
            min_sample_size: 10,
            significance: 0.05,
            display_threshold: 2,
            top_pairs: 2,
        };
        let KsOutput::TopPairs(pairs) = ks_matrix(&distribution, &options).unwrap() else {
            panic!("expected top pairs");
        };
        let labels: Vec<(&str, &str)> = pairs
            .iter()
            .map(|c| (c.left.as_str(), c.right.as_str()))
            .collect();
        assert_eq!(labels, vec![("A", "C"), ("B", "C")]);
    }
}
