// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered-vertex polygons and the queries frames run against them.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Line, ParamCurveNearest, Point, Rect, Vec2};

use crate::primitives::{NORMALIZE_EPSILON, Rectangle, VecExt, segments_intersect};

/// Polygons whose absolute area is at or below this are treated as degenerate.
pub const AREA_EPSILON: f64 = 1e-9;

/// A filled triangle, as produced by [`Polygon::triangulate`].
pub type Triangle = [Point; 3];

/// A closed polygon stored as an ordered list of vertices.
///
/// The closing edge from the last vertex back to the first is implicit.
/// An empty polygon is valid and means "nothing to draw yet". Polygons built
/// by [`convex_hull`](crate::convex_hull) are convex and wound
/// counter-clockwise in a y-up frame; most queries also accept simple
/// polygons of either winding.
///
/// Zero-area polygons (a single point, a segment) are valid but invisible:
/// [`contains`](Self::contains) is always `false` for them, while
/// [`distance_to_nearest_edge`](Self::distance_to_nearest_edge) still
/// reports the distance to the degenerate outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    verts: Vec<Point>,
}

impl Polygon {
    /// Creates an empty polygon.
    #[must_use]
    pub const fn new() -> Self {
        Self { verts: Vec::new() }
    }

    /// Creates a polygon from an ordered list of vertices.
    #[must_use]
    pub fn from_points(verts: impl IntoIterator<Item = Point>) -> Self {
        Self {
            verts: verts.into_iter().collect(),
        }
    }

    /// Returns the vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.verts
    }

    /// Consumes the polygon, returning its vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Point> {
        self.verts
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    /// Signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding in a y-up frame.
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.verts.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.verts[i];
            let q = self.verts[(i + 1) % n];
            sum += p.x * q.y - q.x * p.y;
        }
        sum * 0.5
    }

    /// Returns `true` if the polygon encloses no meaningful area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.area().abs() <= AREA_EPSILON
    }

    /// Arithmetic mean of the vertices.
    ///
    /// This is not the area-weighted centroid. It is constant-time per vertex,
    /// lies inside any convex polygon, and is what label centering uses.
    /// Returns the origin for an empty polygon.
    #[must_use]
    pub fn centroid(&self) -> Point {
        if self.verts.is_empty() {
            return Point::ORIGIN;
        }
        let sum = self
            .verts
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / self.verts.len() as f64).to_point()
    }

    /// Axis-aligned bounds of the vertices, or `None` when empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let (first, rest) = self.verts.split_first()?;
        let init = Rect::from_points(*first, *first);
        Some(rest.iter().fold(init, |r, p| r.union_pt(*p)))
    }

    /// Iterates the edges, wrapping from the last vertex back to the first.
    ///
    /// A single-vertex polygon yields one zero-length edge; an empty one yields
    /// nothing.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.verts.len();
        (0..n).map(move |i| Line::new(self.verts[i], self.verts[(i + 1) % n]))
    }

    /// Returns the edges flattened into consecutive point pairs.
    ///
    /// This is the layout line-list renderers consume: `[p0, p1, p1, p2, ...]`.
    #[must_use]
    pub fn edge_points(&self) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.verts.len() * 2);
        for edge in self.edges() {
            out.push(edge.p0);
            out.push(edge.p1);
        }
        out
    }

    /// Per-vertex outward unit normals.
    ///
    /// Each normal is the normalized average of the outward normals of the two
    /// edges meeting at the vertex. Orientation is taken from the sign of the
    /// area, so both windings produce outward normals. Zero-length edges
    /// contribute nothing rather than NaN.
    #[must_use]
    pub fn normals(&self) -> Vec<Vec2> {
        let n = self.verts.len();
        if n < 2 {
            return alloc::vec![Vec2::ZERO; n];
        }
        // For counter-clockwise order the outward normal of edge direction `d`
        // is `d.tangent()`; flip for clockwise.
        let sign = if self.area() < 0.0 { -1.0 } else { 1.0 };
        let edge_normal = |a: Point, b: Point| {
            (b - a).normalize_or_zero(NORMALIZE_EPSILON).tangent() * sign
        };
        (0..n)
            .map(|i| {
                let prev = self.verts[(i + n - 1) % n];
                let cur = self.verts[i];
                let next = self.verts[(i + 1) % n];
                let avg = edge_normal(prev, cur) + edge_normal(cur, next);
                avg.normalize_or_zero(NORMALIZE_EPSILON)
            })
            .collect()
    }

    /// Returns a copy with every vertex pushed `distance` along its normal.
    ///
    /// Used to give subframes a visible gap inside their parent's hull.
    #[must_use]
    pub fn inflate(&self, distance: f64) -> Self {
        let normals = self.normals();
        Self {
            verts: self
                .verts
                .iter()
                .zip(normals)
                .map(|(p, n)| *p + n * distance)
                .collect(),
        }
    }

    /// Point-in-polygon test by crossing number.
    ///
    /// Degenerate polygons never contain anything.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        if self.verts.len() < 3 || self.is_degenerate() {
            return false;
        }
        let mut inside = false;
        for edge in self.edges() {
            let (a, b) = (edge.p0, edge.p1);
            if (a.y > pt.y) != (b.y > pt.y) {
                let x = a.x + (pt.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if pt.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Distance from `pt` to the closest point on the outline.
    ///
    /// Returns `f64::INFINITY` for an empty polygon.
    #[must_use]
    pub fn distance_to_nearest_edge(&self, pt: Point) -> f64 {
        self.edges()
            .map(|edge| edge.nearest(pt, 0.).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// Fan triangulation around the [`centroid`](Self::centroid).
    ///
    /// Valid for convex polygons, which is all the hull builder produces.
    /// Polygons with fewer than 3 vertices yield no triangles.
    #[must_use]
    pub fn triangulate(&self) -> Vec<Triangle> {
        self.triangulate_around(self.centroid())
    }

    /// Fan triangulation around an arbitrary interior point.
    #[must_use]
    pub fn triangulate_around(&self, center: Point) -> Vec<Triangle> {
        if self.verts.len() < 3 {
            return Vec::new();
        }
        self.edges().map(|e| [e.p0, e.p1, center]).collect()
    }

    /// Returns a copy with every vertex mapped through `f`.
    #[must_use]
    pub fn transformed(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            verts: self.verts.iter().map(|p| f(*p)).collect(),
        }
    }

    /// Returns a copy with every vertex mapped through `affine`.
    #[must_use]
    pub fn transform(&self, affine: Affine) -> Self {
        self.transformed(|p| affine * p)
    }

    /// Returns a copy translated by `delta`.
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        self.transformed(|p| p + delta)
    }

    /// Returns `true` if any part of the polygon can be seen through `rect`.
    ///
    /// Checks run cheapest first: is `center` inside, is any vertex inside,
    /// does any edge cross a rectangle edge. `center` is usually the cached
    /// [`centroid`](Self::centroid). If none of those hold, the rectangle can
    /// still sit wholly inside a large polygon, which a single corner
    /// containment test settles.
    ///
    /// Degenerate polygons are invisible and never intersect anything.
    #[must_use]
    pub fn intersects_rect(&self, center: Point, rect: Rect) -> bool {
        let view = Rectangle::from(rect);
        if self.verts.is_empty() || self.is_degenerate() {
            return false;
        }
        if view.contains(center) {
            return true;
        }
        if self.verts.iter().any(|v| view.contains(*v)) {
            return true;
        }
        let view_edges = view.edges();
        if self
            .edges()
            .any(|e| view_edges.iter().any(|v| segments_intersect(e, *v)))
        {
            return true;
        }
        self.contains(view.a)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(verts: Vec<Point>) -> Self {
        Self { verts }
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}
