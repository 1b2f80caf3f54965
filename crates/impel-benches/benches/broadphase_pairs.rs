// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Benchmark: broad-phase rebuild plus pair generation.
//!
//! Scatters `n` random boxes over a fixed field and times one full frame of
//! the broad-phase protocol (clear, bound, inserts, pairs) for the quadtree
//! against the all-pairs reference. Throughput elements are inserted boxes.
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use impel_benches::{scattered_boxes, FIELD};
use impel_core::{Aabb, AllPairs, BroadPhase, F32Scalar, QuadTree, Vec2};
use impel_geom::ColliderAabb;

fn frame<B: BroadPhase<F32Scalar>>(broad: &mut B, entries: &[ColliderAabb<F32Scalar>]) -> usize {
    let half = FIELD * 0.5;
    broad.clear();
    broad.set_world_bound(Aabb::new(Vec2::from_f32(-half, -half), Vec2::from_f32(half, half)));
    for entry in entries {
        broad.insert(*entry);
    }
    broad.calculate_pairs();
    broad.possible_pairs().len()
}

fn bench_broadphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase_pairs");
    group.warm_up_time(Duration::from_secs(2)).measurement_time(Duration::from_secs(6)).sample_size(60);
    for &n in &[64usize, 256, 1_024, 4_096] {
        let entries = scattered_boxes::<F32Scalar>(n, 0xB0A7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("quadtree", n), &entries, |b, entries| {
            let mut tree = QuadTree::default();
            b.iter(|| criterion::black_box(frame(&mut tree, entries)));
        });
        // Quadratic; only worth timing at the small end.
        if n <= 1_024 {
            group.bench_with_input(BenchmarkId::new("all_pairs", n), &entries, |b, entries| {
                let mut all = AllPairs::new();
                b.iter(|| criterion::black_box(frame(&mut all, entries)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_broadphase);
criterion_main!(benches);
