// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use understory_hull::{HullBuilder, HullParams, Polygon, convex_hull};

/// Node boxes scattered over a grid, with a deterministic jitter.
fn boxes(n: usize) -> Vec<Rect> {
    let cols = (n as f64).sqrt().ceil() as usize;
    (0..n)
        .map(|i| {
            let (cx, cy) = ((i % cols) as f64, (i / cols) as f64);
            let jitter = ((i * 37) % 17) as f64;
            let x = cx * 220.0 + jitter;
            let y = cy * 140.0 - jitter;
            Rect::new(x, y, x + 160.0, y + 90.0)
        })
        .collect()
}

fn bench_convex_hull(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull/convex_hull");

    for n in [16usize, 256, 4_096] {
        let points: Vec<Point> = boxes(n)
            .iter()
            .flat_map(|r| [r.origin(), Point::new(r.x1, r.y0), Point::new(r.x0, r.y1), Point::new(r.x1, r.y1)])
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| black_box(convex_hull(black_box(points))));
        });
    }

    group.finish();
}

fn bench_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull/builder");

    // Models one frame rebuild: member boxes, one marker, one nested hull.
    for n in [4usize, 32, 256] {
        let rects = boxes(n);
        let child = {
            let mut b = HullBuilder::new(HullParams::default());
            b.push_rect(Rect::new(40.0, 40.0, 200.0, 130.0));
            b.build()
        };
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &rects, |b, rects| {
            b.iter_batched(
                || HullBuilder::new(HullParams::default()),
                |mut builder| {
                    for r in rects {
                        builder.push_rect(*r);
                    }
                    builder.push_marker(Point::new(-120.0, 60.0));
                    builder.push_subframe(&child);
                    black_box(builder.build());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_bevel(c: &mut Criterion) {
    let mut group = c.benchmark_group("hull/bevel");

    let hull: Polygon = convex_hull(
        &boxes(64)
            .iter()
            .flat_map(|r| [r.origin(), Point::new(r.x1, r.y1)])
            .collect::<Vec<_>>(),
    );
    for samples in [2usize, 4, 16] {
        group.throughput(Throughput::Elements((hull.len() * samples) as u64));
        group.bench_with_input(BenchmarkId::new("samples", samples), &samples, |b, samples| {
            b.iter(|| black_box(hull.bevel_with(15.0, *samples)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convex_hull, bench_builder, bench_bevel);
criterion_main!(benches);
