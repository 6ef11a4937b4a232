// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Corner smoothing for rendering.
//!
//! Bevelled polygons are for drawing only. Hit testing keeps using the raw
//! hull so that picking does not depend on the smoothing radius.

use alloc::vec::Vec;

use kurbo::{ParamCurve, Point, QuadBez};

use crate::polygon::Polygon;
use crate::primitives::{NORMALIZE_EPSILON, VecExt};

/// Effective radii at or below this leave the corner untouched.
pub const BEVEL_EPSILON: f64 = 1e-9;

/// Samples emitted per corner by [`Polygon::bevel`].
pub const DEFAULT_BEVEL_SAMPLES: usize = 4;

/// Consecutive samples closer than this are merged.
const MERGE_DISTANCE: f64 = 1e-6;

impl Polygon {
    /// Rounds every corner with [`DEFAULT_BEVEL_SAMPLES`] samples.
    ///
    /// See [`bevel_with`](Self::bevel_with).
    #[must_use]
    pub fn bevel(&self, radius: f64) -> Self {
        self.bevel_with(radius, DEFAULT_BEVEL_SAMPLES)
    }

    /// Rounds every corner with a quadratic blend between its two edges.
    ///
    /// Each vertex `v` is replaced by `samples` points on the quadratic Bézier
    /// running from `radius` before `v` on the incoming edge, through control
    /// point `v`, to `radius` after `v` on the outgoing edge. The radius is
    /// clamped per corner to half of each adjacent edge so neighbouring
    /// corners never overlap; this keeps short edges (frames being dragged
    /// onto each other, single-member frames) free of self-intersections.
    ///
    /// A corner whose clamped radius is at or below [`BEVEL_EPSILON`] keeps
    /// its original vertex, so `bevel_with(0.0, _)` returns the input.
    /// Where two corners meet in the middle of an edge their shared sample
    /// is emitted once. Polygons with fewer than 3 vertices are returned
    /// unchanged.
    #[must_use]
    pub fn bevel_with(&self, radius: f64, samples: usize) -> Self {
        let verts = self.vertices();
        let n = verts.len();
        if n < 3 || samples == 0 || radius <= BEVEL_EPSILON {
            return self.clone();
        }

        let mut out = Vec::with_capacity(n * samples);
        for i in 0..n {
            let prev = verts[(i + n - 1) % n];
            let cur = verts[i];
            let next = verts[(i + 1) % n];

            let to_prev = prev - cur;
            let to_next = next - cur;
            let r = radius
                .min(to_prev.hypot() * 0.5)
                .min(to_next.hypot() * 0.5);
            if r <= BEVEL_EPSILON {
                push_distinct(&mut out, cur);
                continue;
            }

            let start = cur + to_prev.normalize_or_zero(NORMALIZE_EPSILON) * r;
            let end = cur + to_next.normalize_or_zero(NORMALIZE_EPSILON) * r;
            push_corner(&mut out, QuadBez::new(start, cur, end), samples);
        }
        if out.len() > 1 && out[0].distance(out[out.len() - 1]) < MERGE_DISTANCE {
            out.pop();
        }
        Self::from(out)
    }
}

fn push_corner(out: &mut Vec<Point>, curve: QuadBez, samples: usize) {
    if samples == 1 {
        push_distinct(out, curve.eval(0.5));
        return;
    }
    let last = (samples - 1) as f64;
    for s in 0..samples {
        push_distinct(out, curve.eval(s as f64 / last));
    }
}

fn push_distinct(out: &mut Vec<Point>, pt: Point) {
    if out.last().is_none_or(|prev| prev.distance(pt) >= MERGE_DISTANCE) {
        out.push(pt);
    }
}
