use crate::aggregate::{reduce_to_segments, reduce_to_vertices, sum_values, value_count};
use crate::stats::{simpson_unweighted, simpson_weighted};
use interseg_core::{Edge, SegmentedRecord, Weightedness};

/// Simpson index of one individual's connections across segments.
pub fn individual_diversity(segmented: &[SegmentedRecord], weightedness: Weightedness) -> f64 {
    let segments = reduce_to_segments(segmented);
    match weightedness {
        Weightedness::Unweighted => simpson_unweighted(segments.values(), value_count(segmented)),
        Weightedness::Weighted => simpson_weighted(segments.values(), sum_values(segmented)),
    }
}

/// Weighted Simpson index for every vertex, treating each incident edge weight
/// as its own category. Ordered by vertex.
pub fn network_diversity<K: Ord + Clone>(edges: &[Edge<K>]) -> Vec<(K, f64)> {
    reduce_to_vertices(edges)
        .into_iter()
        .map(|(vertex, weights)| {
            let total: f64 = weights.iter().sum();
            let index = simpson_weighted(weights.iter().map(std::slice::from_ref), total);
            (vertex, index)
        })
        .collect()
}
