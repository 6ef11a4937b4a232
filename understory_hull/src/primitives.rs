// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small vector and rectangle helpers layered on Kurbo types.

use kurbo::{Line, Point, Rect, Size, Vec2};

/// Epsilon added to lengths before dividing by them.
pub const NORMALIZE_EPSILON: f64 = 1e-8;

/// Extra vector operations used by the hull and label code.
pub trait VecExt {
    /// Rotates the vector by 90 degrees clockwise in a y-up frame: `(x, y) -> (y, -x)`.
    fn tangent(self) -> Self;

    /// Divides the vector by `length + eps`.
    ///
    /// Zero-length input yields the zero vector instead of NaN.
    fn normalize_or_zero(self, eps: f64) -> Self;
}

impl VecExt for Vec2 {
    #[inline]
    fn tangent(self) -> Self {
        Self::new(self.y, -self.x)
    }

    #[inline]
    fn normalize_or_zero(self, eps: f64) -> Self {
        self / (self.hypot() + eps)
    }
}

/// An axis-aligned rectangle described by two opposite corners.
///
/// The corners may come in any order. Node editors commonly describe boxes
/// by their top-left corner in a y-up space, so `a` may well be the corner
/// with the *largest* y. All queries sort the coordinates per axis first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    /// First corner.
    pub a: Point,
    /// Opposite corner.
    pub b: Point,
}

impl Rectangle {
    /// Creates a rectangle from two opposite corners.
    #[must_use]
    pub fn new(a: impl Into<Point>, b: impl Into<Point>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Returns the normalized Kurbo rectangle (`x0 <= x1`, `y0 <= y1`).
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::from_points(self.a, self.b)
    }

    /// Returns `true` if `pt` lies inside or on the boundary.
    #[must_use]
    pub fn contains(self, pt: Point) -> bool {
        let r = self.to_rect();
        pt.x >= r.x0 && pt.x <= r.x1 && pt.y >= r.y0 && pt.y <= r.y1
    }

    /// Returns the absolute width and height.
    #[must_use]
    pub fn size(self) -> Size {
        self.to_rect().size()
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(self) -> Point {
        self.a.midpoint(self.b)
    }

    /// Returns the four corners in counter-clockwise order (y-up), starting at the minimum corner.
    #[must_use]
    pub fn corners(self) -> [Point; 4] {
        let r = self.to_rect();
        [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }

    /// Returns the four boundary segments.
    #[must_use]
    pub fn edges(self) -> [Line; 4] {
        let [c0, c1, c2, c3] = self.corners();
        [
            Line::new(c0, c1),
            Line::new(c1, c2),
            Line::new(c2, c3),
            Line::new(c3, c0),
        ]
    }
}

impl From<Rect> for Rectangle {
    fn from(r: Rect) -> Self {
        Self::new((r.x0, r.y0), (r.x1, r.y1))
    }
}

/// Returns `true` if `pt` lies inside `rect` or on its boundary.
///
/// Kurbo's [`Rect::contains`] excludes the maximum edges; frame culling wants
/// them included. The rectangle does not need to be normalized.
#[must_use]
pub fn rect_contains_inclusive(rect: Rect, pt: Point) -> bool {
    Rectangle::from(rect).contains(pt)
}

/// Cross product of `(b - a)` and `(c - a)`.
#[inline]
pub(crate) fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Returns `true` if two closed segments share at least one point.
///
/// Collinear overlapping segments and touching endpoints count as
/// intersecting.
#[must_use]
pub fn segments_intersect(s: Line, t: Line) -> bool {
    let d1 = cross(t.p0, t.p1, s.p0);
    let d2 = cross(t.p0, t.p1, s.p1);
    let d3 = cross(s.p0, s.p1, t.p0);
    let d4 = cross(s.p0, s.p1, t.p1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(t.p0, t.p1, s.p0))
        || (d2 == 0.0 && on_segment(t.p0, t.p1, s.p1))
        || (d3 == 0.0 && on_segment(s.p0, s.p1, t.p0))
        || (d4 == 0.0 && on_segment(s.p0, s.p1, t.p1))
}
