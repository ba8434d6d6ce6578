//! Batch reductions of segmented records into per-key distributions.

use interseg_core::{Edge, Record, SegmentLabel, SegmentedRecord, Weightedness};
use std::collections::BTreeMap;

/// Values observed for each key, in source order within a key.
pub type Distribution<K> = BTreeMap<K, Vec<f64>>;
pub type SegmentDistribution = Distribution<SegmentLabel>;

pub const ALL_SEGMENT: &str = "all";

/// Label of the bucket holding everything outside `focal`.
pub fn complement_label(focal: &str) -> SegmentLabel {
    format!("not {}", focal)
}

pub fn reduce_to_segments(records: &[SegmentedRecord]) -> SegmentDistribution {
    let mut segments = SegmentDistribution::new();
    for record in records {
        segments
            .entry(record.key.clone())
            .or_default()
            .extend_from_slice(&record.values);
    }
    segments
}

pub fn reduce_to_all(records: &[SegmentedRecord]) -> SegmentDistribution {
    let values = records
        .iter()
        .flat_map(|record| record.values.iter().copied())
        .collect();
    BTreeMap::from([(ALL_SEGMENT.to_string(), values)])
}

/// Splits values into `focal` and `not focal`. Both buckets are always present.
pub fn reduce_to_in_out(records: &[SegmentedRecord], focal: &str) -> SegmentDistribution {
    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for record in records {
        if record.key == focal {
            inside.extend_from_slice(&record.values);
        } else {
            outside.extend_from_slice(&record.values);
        }
    }
    BTreeMap::from([(focal.to_string(), inside), (complement_label(focal), outside)])
}

/// Collects each vertex's incident edge weights. A self-loop counts once.
pub fn reduce_to_vertices<K: Ord + Clone>(edges: &[Edge<K>]) -> Distribution<K> {
    let mut vertices = Distribution::new();
    for edge in edges {
        vertices
            .entry(edge.source.clone())
            .or_insert_with(Vec::new)
            .push(edge.weight);
        if edge.source != edge.target {
            vertices
                .entry(edge.target.clone())
                .or_insert_with(Vec::new)
                .push(edge.weight);
        }
    }
    vertices
}

/// Total weight of the edges touching each vertex, each edge counted once.
pub fn vertex_totals<K: Ord + Clone>(edges: &[Edge<K>]) -> BTreeMap<K, f64> {
    reduce_to_vertices(edges)
        .into_iter()
        .map(|(vertex, weights)| (vertex, weights.iter().sum()))
        .collect()
}

pub fn sum_values<K>(records: &[Record<K>]) -> f64 {
    records.iter().map(Record::value_sum).sum()
}

pub fn value_count<K>(records: &[Record<K>]) -> usize {
    records.iter().map(|record| record.values.len()).sum()
}

/// Applies `func` to the values of each record.
pub fn accumulate_lines<K, F>(records: &[Record<K>], func: F) -> Vec<(K, f64)>
where
    K: Clone,
    F: Fn(&[f64]) -> f64,
{
    records
        .iter()
        .map(|record| (record.key.clone(), func(&record.values)))
        .collect()
}

/// Size of each bucket: value count when unweighted, value sum when weighted.
pub fn rollup<K: Ord + Clone>(
    distribution: &Distribution<K>,
    weightedness: Weightedness,
) -> BTreeMap<K, f64> {
    distribution
        .iter()
        .map(|(key, values)| {
            let size = match weightedness {
                Weightedness::Unweighted => values.len() as f64,
                Weightedness::Weighted => values.iter().sum(),
            };
            (key.clone(), size)
        })
        .collect()
}
