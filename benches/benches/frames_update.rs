// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use understory_frames::{Frames, MemberGeometry, NoLabels};

type Nodes = HashMap<u32, MemberGeometry>;

/// `groups` frames of `per_group` nodes each, nested in pairs.
fn scene(groups: u32, per_group: u32) -> (Frames<u32>, Nodes) {
    let mut nodes = Nodes::new();
    let mut frames = Frames::new();
    let mut prev = None;
    for g in 0..groups {
        let keys: Vec<u32> = (0..per_group).map(|i| g * per_group + i).collect();
        for (i, k) in keys.iter().enumerate() {
            let loc = Point::new(f64::from(g) * 900.0 + i as f64 * 180.0, (i % 3) as f64 * 120.0);
            nodes.insert(*k, MemberGeometry::rect(loc, Size::new(150.0, 90.0)));
        }
        let id = frames.add_frame(keys, &nodes);
        match prev.take() {
            Some(outer) => {
                let _ = frames.add_subframe(outer, id);
            }
            None => prev = Some(id),
        }
    }
    (frames, nodes)
}

fn visible() -> Rect {
    Rect::new(-1e5, -1e5, 1e5, 1e5)
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames/update_clean");

    // Nothing moves: change detection and projection only.
    for groups in [8u32, 64, 256] {
        let (mut frames, nodes) = scene(groups, 6);
        frames.update(&nodes, &Affine::IDENTITY, &NoLabels, visible());
        group.throughput(Throughput::Elements(u64::from(groups)));
        group.bench_function(BenchmarkId::from_parameter(groups), |b| {
            b.iter(|| {
                black_box(frames.update(&nodes, &Affine::IDENTITY, &NoLabels, visible()));
            });
        });
    }

    group.finish();
}

fn bench_drag_one_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames/update_drag");

    // One member moves per pass: one frame and its ancestors rebuild.
    for groups in [8u32, 64, 256] {
        let (frames, nodes) = scene(groups, 6);
        group.throughput(Throughput::Elements(u64::from(groups)));
        group.bench_function(BenchmarkId::from_parameter(groups), |b| {
            b.iter_batched(
                || {
                    let mut frames = frames.clone();
                    let mut nodes = nodes.clone();
                    frames.update(&nodes, &Affine::IDENTITY, &NoLabels, visible());
                    if let Some(g) = nodes.get_mut(&0) {
                        g.location += Vec2::new(25.0, 10.0);
                    }
                    (frames, nodes)
                },
                |(mut frames, nodes)| {
                    black_box(frames.update(&nodes, &Affine::IDENTITY, &NoLabels, visible()));
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_cold_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("frames/update_cold");
    group.sample_size(30);

    for groups in [8u32, 64] {
        let (frames, nodes) = scene(groups, 6);
        group.throughput(Throughput::Elements(u64::from(groups)));
        group.bench_function(BenchmarkId::from_parameter(groups), |b| {
            b.iter_batched(
                || frames.clone(),
                |mut frames| {
                    black_box(frames.update(&nodes, &Affine::scale(0.5), &NoLabels, visible()));
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_steady_state, bench_drag_one_node, bench_cold_build);
criterion_main!(benches);
