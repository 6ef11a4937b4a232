// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label anchoring against a frame's hull.

use alloc::string::String;
use core::f64::consts::PI;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Size, Vec2};
use understory_hull::{NORMALIZE_EPSILON, Polygon, VecExt};

/// Where a frame's label is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelPlacement {
    /// Horizontal, centered on the highest hull edge.
    #[default]
    Top,
    /// Rotated to run along the longest edge that reads left to right.
    Edge,
    /// Horizontal, centered on the frame.
    Center,
}

impl LabelPlacement {
    /// Returns `true` if the anchor depends on the hull outline.
    #[must_use]
    pub fn follows_shape(self) -> bool {
        matches!(self, Self::Top | Self::Edge)
    }
}

/// User-facing label settings for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSpec {
    /// Text to draw. Empty means no label.
    pub text: String,
    /// Font size.
    pub size: f64,
    /// Anchoring mode.
    pub placement: LabelPlacement,
    /// User nudge, in offset units. For [`LabelPlacement::Edge`] `x` runs
    /// along the edge and `y` across it.
    pub offset: Vec2,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: 20.0,
            placement: LabelPlacement::Top,
            offset: Vec2::ZERO,
        }
    }
}

/// Resolved label position: bottom-left text origin in view space and the
/// rotation in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelPose {
    /// Text origin.
    pub loc: Point,
    /// Rotation, counter-clockwise in a y-up frame.
    pub rot: f64,
}

/// Places a label of view-space size `dims` against `shape`.
///
/// `center` is the frame center used by [`LabelPlacement::Center`] and as
/// the fallback anchor when `shape` is empty. Offsets are multiplied by
/// `offset_scale`.
///
/// ```rust
/// use kurbo::{Point, Size, Vec2};
/// use understory_frames::{LabelPlacement, LabelSpec, place_label};
/// use understory_hull::Polygon;
///
/// let square = Polygon::from_points([
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ]);
/// let spec = LabelSpec { placement: LabelPlacement::Top, ..LabelSpec::default() };
/// let pose = place_label(&square, Point::new(5.0, 5.0), &spec, Size::new(4.0, 1.0), 10.0);
/// // Centered on the top edge.
/// assert!((pose.loc.x - 3.0).abs() < 1e-6);
/// assert!((pose.loc.y - 10.0).abs() < 1e-6);
/// assert_eq!(pose.rot, 0.0);
/// ```
#[must_use]
pub fn place_label(
    shape: &Polygon,
    center: Point,
    spec: &LabelSpec,
    dims: Size,
    offset_scale: f64,
) -> LabelPose {
    let offset = spec.offset * offset_scale;
    let horizontal = |loc: Point| LabelPose {
        loc: loc + offset,
        rot: 0.0,
    };

    match spec.placement {
        LabelPlacement::Center => horizontal(center - dims.to_vec2() / 2.0),
        _ if shape.is_empty() => horizontal(center),
        LabelPlacement::Top => {
            let (start, end) = pick_edge(shape, |start, end| start.y + end.y);
            horizontal(anchor_on_edge(start, end, dims.width))
        }
        LabelPlacement::Edge => {
            let (start, end) = pick_edge(shape, |start, end| {
                let dir = start - end;
                let reads_forward = dir
                    .normalize_or_zero(NORMALIZE_EPSILON)
                    .dot(Vec2::new(-1.0, 0.0))
                    > 0.6;
                if reads_forward { dir.hypot() } else { 0.0 }
            });
            let loc = anchor_on_edge(start, end, dims.width);
            let normal = (start - end).normalize_or_zero(NORMALIZE_EPSILON);
            let tangent = normal.tangent();
            LabelPose {
                loc: loc + (tangent * spec.offset.y + normal * spec.offset.x) * offset_scale,
                rot: normal.y.atan2(normal.x) + PI,
            }
        }
    }
}

/// Edges as `(start, end)` pairs in reading order.
///
/// Text laid along `end -> start` reads left to right for the upper edges
/// of a counter-clockwise hull in a y-up frame, so the hull's own edge
/// direction is reversed for that winding.
fn reading_edges(shape: &Polygon) -> impl Iterator<Item = (Point, Point)> + '_ {
    let ccw = shape.area() >= 0.0;
    shape
        .edges()
        .map(move |Line { p0, p1 }| if ccw { (p1, p0) } else { (p0, p1) })
}

/// Returns the first edge with the greatest score.
fn pick_edge(shape: &Polygon, score: impl Fn(Point, Point) -> f64) -> (Point, Point) {
    let mut best: Option<((Point, Point), f64)> = None;
    for (start, end) in reading_edges(shape) {
        let s = score(start, end);
        if best.is_none_or(|(_, b)| s > b) {
            best = Some(((start, end), s));
        }
    }
    best.map_or((Point::ORIGIN, Point::ORIGIN), |(edge, _)| edge)
}

/// Text origin that centers a label of `width` on the edge.
fn anchor_on_edge(start: Point, end: Point, width: f64) -> Point {
    let len = (start - end).hypot();
    let fac = 0.5 + (width / (len + NORMALIZE_EPSILON)) / 2.0;
    end.lerp(start, fac)
}
