// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for hull correctness and bevel safety.

use kurbo::{Point, Rect};
use proptest::prelude::*;
use understory_hull::{HullBuilder, HullParams, Polygon, convex_hull, segments_intersect};

fn point() -> impl Strategy<Value = Point> {
    (-500.0..500.0_f64, -500.0..500.0_f64).prop_map(|(x, y)| Point::new(x, y))
}

fn point_cloud() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(point(), 3..64)
}

/// Non-adjacent edges of a closed polygon must not touch.
fn is_simple(poly: &Polygon) -> bool {
    let edges: Vec<_> = poly.edges().collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(edges[i], edges[j]) {
                return false;
            }
        }
    }
    true
}

proptest! {
    #[test]
    fn hull_vertices_come_from_input(points in point_cloud()) {
        let hull = convex_hull(&points);
        for v in hull.vertices() {
            prop_assert!(points.contains(v));
        }
    }

    #[test]
    fn hull_winds_consistently(points in point_cloud()) {
        let hull = convex_hull(&points);
        prop_assume!(!hull.is_degenerate());
        prop_assert!(hull.area() > 0.0);
        let verts = hull.vertices();
        let n = verts.len();
        for i in 0..n {
            let a = verts[i];
            let b = verts[(i + 1) % n];
            let c = verts[(i + 2) % n];
            prop_assert!((b - a).cross(c - b) > -1e-9);
        }
    }

    #[test]
    fn hull_encloses_every_input(points in point_cloud()) {
        let hull = convex_hull(&points);
        prop_assume!(!hull.is_degenerate());
        for p in &points {
            let inside = hull.contains(*p) || hull.distance_to_nearest_edge(*p) < 1e-6;
            prop_assert!(inside, "{p:?} escaped the hull");
        }
    }

    #[test]
    fn centroid_is_inside(points in point_cloud()) {
        let hull = convex_hull(&points);
        prop_assume!(hull.area() > 1.0);
        prop_assert!(hull.contains(hull.centroid()));
    }

    #[test]
    fn zero_bevel_is_identity(points in point_cloud()) {
        let hull = convex_hull(&points);
        prop_assert_eq!(hull.bevel(0.0), hull);
    }

    #[test]
    fn bevel_within_half_edge_stays_simple(points in point_cloud(), frac in 0.05..=1.0_f64) {
        let hull = convex_hull(&points);
        prop_assume!(hull.area() > 1.0);
        let shortest = hull
            .edges()
            .map(|e| e.length())
            .fold(f64::INFINITY, f64::min);
        prop_assume!(shortest > 1e-3);
        let bevelled = hull.bevel(shortest * 0.5 * frac);
        prop_assert!(is_simple(&bevelled));
        prop_assert!(bevelled.area() > 0.0);
    }

    #[test]
    fn single_padded_rect_area(
        x in -100.0..100.0_f64,
        y in -100.0..100.0_f64,
        w in 1.0..300.0_f64,
        h in 1.0..300.0_f64,
        pad in 0.0..40.0_f64,
    ) {
        let mut builder = HullBuilder::new(HullParams { padding: pad, ..HullParams::default() });
        builder.push_rect(Rect::new(x, y, x + w, y + h));
        let expected = (w + 2.0 * pad) * (h + 2.0 * pad);
        prop_assert!((builder.build().area() - expected).abs() < 1e-6 * expected.max(1.0));
    }
}
