// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex hulls and the point-cloud builder that feeds them.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use crate::polygon::Polygon;
use crate::primitives::cross;

/// Computes the convex hull of `points` with Andrew's monotone chain.
///
/// The result is counter-clockwise in a y-up frame and contains no repeated
/// closing vertex. Collinear points on the hull boundary are dropped.
///
/// Degenerate inputs do not fail: no points gives an empty polygon, a single
/// distinct point gives a one-vertex polygon, and collinear input gives its
/// two extreme points.
///
/// ```rust
/// use kurbo::Point;
/// use understory_hull::convex_hull;
///
/// let hull = convex_hull(&[
///     Point::new(0.0, 0.0),
///     Point::new(4.0, 0.0),
///     Point::new(2.0, 1.0),
///     Point::new(4.0, 4.0),
///     Point::new(0.0, 4.0),
/// ]);
/// assert_eq!(hull.len(), 4);
/// assert_eq!(hull.area(), 16.0);
/// ```
#[must_use]
pub fn convex_hull(points: &[Point]) -> Polygon {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    });
    sorted.dedup();

    if sorted.len() < 3 {
        return Polygon::from(sorted);
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() + 1);
    // Lower chain.
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper chain; never pop into the lower chain.
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    // The last point repeats the first.
    hull.pop();
    Polygon::from(hull)
}

/// Tuning for [`HullBuilder`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullParams {
    /// Outward padding applied to every side of rectangular members.
    pub padding: f64,
    /// Radius of the circle sampled around point markers.
    pub marker_radius: f64,
    /// Number of samples on a marker's circle.
    pub marker_samples: usize,
    /// Distance subframe hull vertices are pushed out along their normals.
    pub subframe_inflation: f64,
}

impl Default for HullParams {
    fn default() -> Self {
        Self {
            padding: 20.0,
            marker_radius: 40.0,
            marker_samples: 12,
            subframe_inflation: 20.0,
        }
    }
}

/// Collects the point cloud for one frame and hulls it.
///
/// Members contribute points in the order they are pushed; order does not
/// affect the resulting hull.
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use understory_hull::{HullBuilder, HullParams};
///
/// let params = HullParams { padding: 0.0, ..HullParams::default() };
/// let mut builder = HullBuilder::new(params);
/// builder.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
/// builder.push_rect(Rect::new(20.0, 0.0, 30.0, 10.0));
/// let hull = builder.build();
/// assert_eq!(hull.area(), 300.0);
/// ```
#[derive(Clone, Debug)]
pub struct HullBuilder {
    params: HullParams,
    points: Vec<Point>,
}

impl HullBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(params: HullParams) -> Self {
        Self {
            params,
            points: Vec::new(),
        }
    }

    /// Returns the parameters in use.
    #[must_use]
    pub fn params(&self) -> &HullParams {
        &self.params
    }

    /// Adds the four padded corners of a rectangular member.
    ///
    /// The rectangle may be given with either corner first.
    pub fn push_rect(&mut self, rect: Rect) {
        let r = rect.abs().inflate(self.params.padding, self.params.padding);
        self.points.extend([
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x0, r.y1),
            Point::new(r.x1, r.y1),
        ]);
    }

    /// Adds a ring of samples around a point marker.
    ///
    /// Sample `i` sits at angle `i / samples * TAU`, measured from +y.
    pub fn push_marker(&mut self, center: Point) {
        let n = self.params.marker_samples.max(1);
        let radius = self.params.marker_radius;
        self.points.extend((0..n).map(|i| {
            let angle = i as f64 / n as f64 * TAU;
            Point::new(center.x + angle.sin() * radius, center.y + angle.cos() * radius)
        }));
    }

    /// Adds a child frame's hull, inflated along its vertex normals.
    pub fn push_subframe(&mut self, hull: &Polygon) {
        let inflated = hull.inflate(self.params.subframe_inflation);
        self.points.extend_from_slice(inflated.vertices());
    }

    /// Adds raw points.
    pub fn push_points(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.extend(points);
    }

    /// Returns the points collected so far.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Clears collected points, keeping the allocation.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Hulls the collected points.
    #[must_use]
    pub fn build(&self) -> Polygon {
        convex_hull(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn hull_drops_interior_points() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 7.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(hull.area() > 0.0, "hull must be counter-clockwise");
        assert!(!hull.vertices().contains(&Point::new(5.0, 5.0)));
    }

    #[test]
    fn degenerate_inputs() {
        assert!(convex_hull(&[]).is_empty());

        let one = convex_hull(&[Point::new(1.0, 2.0), Point::new(1.0, 2.0)]);
        assert_eq!(one.vertices(), &[Point::new(1.0, 2.0)]);

        let line = convex_hull(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 3.0),
        ]);
        assert_eq!(line.len(), 2);
        assert_eq!(line.area(), 0.0);
        assert!(line.is_degenerate());
    }

    #[test]
    fn padded_rect_area() {
        let mut b = HullBuilder::new(HullParams {
            padding: 20.0,
            ..HullParams::default()
        });
        b.push_rect(Rect::new(0.0, 0.0, 100.0, 50.0));
        let hull = b.build();
        assert_eq!(hull.len(), 4);
        assert!((hull.area() - 140.0 * 90.0).abs() < 1e-9);
    }

    #[test]
    fn flipped_rect_is_normalized() {
        let mut b = HullBuilder::new(HullParams {
            padding: 0.0,
            ..HullParams::default()
        });
        b.push_rect(Rect::new(10.0, 10.0, 0.0, 0.0));
        assert!((b.build().area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn marker_samples_circle() {
        let params = HullParams::default();
        let mut b = HullBuilder::new(params);
        b.push_marker(Point::new(5.0, 5.0));
        assert_eq!(b.points().len(), params.marker_samples);
        for p in b.points() {
            assert!((p.distance(Point::new(5.0, 5.0)) - params.marker_radius).abs() < 1e-9);
        }
        // First sample is straight up.
        assert!((b.points()[0].y - 45.0).abs() < 1e-9);
        assert_eq!(b.build().len(), params.marker_samples);
    }

    #[test]
    fn subframe_contribution_encloses_child() {
        let params = HullParams {
            padding: 0.0,
            ..HullParams::default()
        };
        let mut child = HullBuilder::new(params);
        child.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        let child_hull = child.build();

        let mut parent = HullBuilder::new(params);
        parent.push_subframe(&child_hull);
        let parent_hull = parent.build();
        for v in child_hull.vertices() {
            assert!(parent_hull.contains(*v));
            assert!(parent_hull.distance_to_nearest_edge(*v) > 10.0);
        }
    }

    #[test]
    fn clear_reuses_builder() {
        let mut b = HullBuilder::new(HullParams::default());
        b.push_points([Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        b.clear();
        assert!(b.points().is_empty());
        assert!(b.build().is_empty());
    }
}
