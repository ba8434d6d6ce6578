//! Text and JSON rendering of analysis results.

use crate::matrix::{KsMatrix, MatrixOutput, SegmentMatrix};
use crate::stats::KsComparison;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// One `label\tvalue` line per entry, in key order.
pub fn render_scalars<K: Display, V: Display>(values: &BTreeMap<K, V>) -> String {
    render_pairs(values.iter())
}

pub fn render_pairs<'a, K, V, I>(pairs: I) -> String
where
    K: Display + 'a,
    V: Display + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut out = String::new();
    for (label, value) in pairs {
        let _ = writeln!(out, "{}\t{}", label, value);
    }
    out
}

/// Header row of labels, then one row per label.
pub fn render_matrix_tsv(matrix: &SegmentMatrix) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\t{}", matrix.labels().join("\t"));
    for (label, row) in matrix.rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}\t{}", label, cells.join("\t"));
    }
    out
}

pub fn render_matrix_output(output: &MatrixOutput) -> String {
    match output {
        MatrixOutput::Matrix(matrix) => render_matrix_tsv(matrix),
        MatrixOutput::Diagonal(values) => {
            render_pairs(values.iter().map(|v| (&v.label, &v.value)))
        }
    }
}

/// KS statistic matrix with `-` in cells whose p-value exceeds `significance`.
pub fn render_ks_matrix_tsv(matrix: &KsMatrix, significance: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\t{}", matrix.statistic.labels().join("\t"));
    for ((label, statistics), (_, p_values)) in matrix.statistic.rows().zip(matrix.p_values.rows()) {
        let cells: Vec<String> = statistics
            .iter()
            .zip(p_values)
            .map(|(statistic, p_value)| {
                if *p_value <= significance {
                    format!("{:.2}", statistic)
                } else {
                    "-".to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "{}\t{}", label, cells.join("\t"));
    }
    out
}

pub fn render_ks_pairs(comparisons: &[KsComparison]) -> String {
    let mut out = String::new();
    for c in comparisons {
        let _ = writeln!(
            out,
            "{} || {} || {:.2} with p-value: {:.2}",
            c.left, c.right, c.statistic, c.p_value
        );
    }
    out
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
