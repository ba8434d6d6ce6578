//! Comparison statistics over distributions.

use crate::aggregate::SegmentDistribution;
use crate::error::AnalysisError;
use interseg_core::SegmentLabel;
use serde::Serialize;
use tracing::debug;

/// Signed relative percent difference `2(a - b) / (a + b)`.
///
/// Positive when `a` exceeds `b`. Fails when `a + b == 0`.
pub fn signed_relative_percent_difference(a: f64, b: f64) -> Result<f64, AnalysisError> {
    let sum = a + b;
    if sum == 0.0 {
        return Err(AnalysisError::DegenerateRpd { a, b });
    }
    Ok(2.0 * (a - b) / sum)
}

/// Absolute relative percent difference `|2(a - b) / (a + b)|`.
pub fn relative_percent_difference(a: f64, b: f64) -> Result<f64, AnalysisError> {
    signed_relative_percent_difference(a, b).map(f64::abs)
}

/// Simpson index from segment sizes: `Σ (len / total_connections)²`.
///
/// Values inside each segment are ignored. Zero when there is nothing to count.
pub fn simpson_unweighted<I, S>(segments: I, total_connections: usize) -> f64
where
    I: IntoIterator<Item = S>,
    S: AsRef<[f64]>,
{
    if total_connections == 0 {
        return 0.0;
    }
    let total = total_connections as f64;
    segments
        .into_iter()
        .map(|segment| (segment.as_ref().len() as f64 / total).powi(2))
        .sum()
}

/// Simpson index from segment weights: `Σ (segment sum / values_sum)²`.
pub fn simpson_weighted<I, S>(segments: I, values_sum: f64) -> f64
where
    I: IntoIterator<Item = S>,
    S: AsRef<[f64]>,
{
    if values_sum == 0.0 {
        return 0.0;
    }
    segments
        .into_iter()
        .map(|segment| (segment.as_ref().iter().sum::<f64>() / values_sum).powi(2))
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
}

/// Two-sample Kolmogorov-Smirnov test.
///
/// The statistic is the largest gap between the two empirical CDFs. The
/// p-value uses the asymptotic Kolmogorov distribution evaluated at
/// `(√nₑ + 0.12 + 0.11/√nₑ)·D` with `nₑ = n·m/(n+m)`.
pub fn ks_two_sample(left: &[f64], right: &[f64]) -> Result<KsResult, AnalysisError> {
    if left.is_empty() || right.is_empty() {
        return Err(AnalysisError::EmptySample {
            left: left.len(),
            right: right.len(),
        });
    }
    if left.iter().chain(right).any(|v| v.is_nan()) {
        return Err(AnalysisError::NanSample);
    }

    let mut a = left.to_vec();
    let mut b = right.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);

    let (n, m) = (a.len(), b.len());
    let (mut i, mut j) = (0usize, 0usize);
    let mut statistic: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        let gap = (i as f64 / n as f64 - j as f64 / m as f64).abs();
        statistic = statistic.max(gap);
    }

    let effective = ((n * m) as f64 / (n + m) as f64).sqrt();
    let lambda = (effective + 0.12 + 0.11 / effective) * statistic;
    Ok(KsResult {
        statistic,
        p_value: kolmogorov_survival(lambda),
    })
}

/// `Q(λ) = 2 Σ_{j≥1} (-1)^{j-1} exp(-2 j² λ²)`, clamped to `[0, 1]`.
fn kolmogorov_survival(lambda: f64) -> f64 {
    const EPS_TERM: f64 = 1e-3;
    const EPS_SUM: f64 = 1e-8;

    let a2 = -2.0 * lambda * lambda;
    let mut sign = 2.0;
    let mut sum = 0.0;
    let mut previous_term = 0.0;
    for j in 1..=100 {
        let j = j as f64;
        let term = sign * (a2 * j * j).exp();
        sum += term;
        if term.abs() <= EPS_TERM * previous_term || term.abs() <= EPS_SUM * sum {
            return sum.clamp(0.0, 1.0);
        }
        sign = -sign;
        previous_term = term.abs();
    }
    // Series does not converge for λ near 0, where Q(λ) → 1.
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KsComparison {
    pub left: SegmentLabel,
    pub right: SegmentLabel,
    pub statistic: f64,
    pub p_value: f64,
}

/// Whether a segment is large enough to take part in pairwise KS tests.
pub fn is_testable(values: &[f64], min_sample_size: usize) -> bool {
    !values.is_empty() && values.len() >= min_sample_size
}

/// KS test for every unordered pair of segments holding at least
/// `min_sample_size` values, in label order. Smaller segments are skipped.
pub fn pairwise_ks(
    distribution: &SegmentDistribution,
    min_sample_size: usize,
) -> Result<Vec<KsComparison>, AnalysisError> {
    let eligible: Vec<(&SegmentLabel, &Vec<f64>)> = distribution
        .iter()
        .filter(|(_, values)| is_testable(values, min_sample_size))
        .collect();
    debug!(
        "pairwise KS over {} of {} segments (min sample size {})",
        eligible.len(),
        distribution.len(),
        min_sample_size
    );

    let mut comparisons = Vec::new();
    for (idx, (left, left_values)) in eligible.iter().enumerate() {
        for (right, right_values) in &eligible[idx + 1..] {
            let result = ks_two_sample(left_values, right_values)?;
            comparisons.push(KsComparison {
                left: (*left).clone(),
                right: (*right).clone(),
                statistic: result.statistic,
                p_value: result.p_value,
            });
        }
    }
    Ok(comparisons)
}
