// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Hull: convex hulls and smoothed outlines around groups of boxes.
//!
//! This crate is the geometry half of shrink-wrapped group frames in node
//! editors and canvas tools. Given a handful of rectangles (node boxes), point
//! markers (reroutes), and already-computed child outlines, it produces:
//! - A convex [`Polygon`] enclosing all of them ([`HullBuilder`], [`convex_hull`]).
//! - A bevelled copy of that polygon for smooth rendering ([`Polygon::bevel`]).
//! - The point, edge, and visibility queries used for picking and culling.
//!
//! It does **not** decide which boxes belong together, cache anything, or
//! talk to a renderer. See `understory_frames` for the bookkeeping layer that
//! tracks membership and recomputes hulls lazily.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_hull::{HullBuilder, HullParams};
//!
//! let mut builder = HullBuilder::new(HullParams::default());
//! builder.push_rect(Rect::new(0.0, 0.0, 120.0, 80.0));
//! builder.push_rect(Rect::new(200.0, 40.0, 320.0, 140.0));
//! builder.push_marker(Point::new(160.0, -60.0));
//!
//! let hull = builder.build();
//! assert!(hull.contains(Point::new(160.0, 60.0)));
//!
//! // Smooth the corners for drawing; keep `hull` for hit testing.
//! let outline = hull.bevel(15.0);
//! assert_eq!(outline.len(), hull.len() * 4);
//! ```
//!
//! ## Conventions
//!
//! - Geometry uses Kurbo types throughout ([`kurbo::Point`], [`kurbo::Vec2`],
//!   [`kurbo::Rect`], [`kurbo::Line`]).
//! - Hulls wind counter-clockwise in a y-up frame, which is clockwise on a
//!   y-down screen. Queries that care about winding read it from the sign of
//!   [`Polygon::area`].
//! - Degenerate output (empty, a point, a segment) is valid. Such polygons
//!   contain no points and are treated as invisible.
//! - Float inputs are assumed to be finite.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bevel;
mod hull;
mod polygon;
mod primitives;

pub use bevel::{BEVEL_EPSILON, DEFAULT_BEVEL_SAMPLES};
pub use hull::{HullBuilder, HullParams, convex_hull};
pub use polygon::{AREA_EPSILON, Polygon, Triangle};
pub use primitives::{
    NORMALIZE_EPSILON, Rectangle, VecExt, rect_contains_inclusive, segments_intersect,
};
