use analysis::matrix::{ks_matrix, rpd_matrix, KsMatrixOptions};
use analysis::SegmentDistribution;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use interseg_core::{Edge, SegmentLabel, SegmentedEdge};
use std::collections::BTreeMap;

const SEGMENTS: usize = 40;

fn label(idx: usize) -> SegmentLabel {
    format!("S{:03}", idx)
}

fn population() -> BTreeMap<SegmentLabel, u64> {
    (0..SEGMENTS).map(|idx| (label(idx), 10 + idx as u64)).collect()
}

fn edges() -> Vec<SegmentedEdge> {
    let mut edges = Vec::new();
    for source in 0..SEGMENTS {
        for target in source..SEGMENTS {
            let weight = 1.0 + ((source * 31 + target * 17) % 13) as f64;
            edges.push(Edge::new(label(source), label(target), weight));
        }
    }
    edges
}

fn distribution() -> SegmentDistribution {
    (0..SEGMENTS)
        .map(|idx| {
            let values = (0..200).map(|i| ((i * (idx + 3)) % 97) as f64).collect();
            (label(idx), values)
        })
        .collect()
}

fn bench_matrices(c: &mut Criterion) {
    let population = population();
    let edges = edges();
    c.bench_function("rpd_matrix_40_segments", |b| {
        b.iter(|| rpd_matrix(black_box(&edges), black_box(&population), 50).unwrap())
    });

    let distribution = distribution();
    let options = KsMatrixOptions::default();
    c.bench_function("ks_matrix_40_segments", |b| {
        b.iter(|| ks_matrix(black_box(&distribution), &options).unwrap())
    });
}

criterion_group!(benches, bench_matrices);
criterion_main!(benches);
