// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Frames: shrink-wrapped, nestable group frames for node editors.
//!
//! A frame is a persistent group drawn as a smooth outline around its
//! members. Frames can nest; a child frame's outline pushes its parent's
//! outline out by a fixed gap. This crate keeps track of:
//! - Which host items (members) and child frames belong to each frame.
//! - When a frame's cached hull is stale, by comparing member geometry against
//!   a snapshot and propagating dirtiness up the parent chain.
//! - Screen projection, culling, label placement, and area-based draw order.
//! - Picking queries: point in frame, point near a frame edge, frustum checks.
//!
//! Geometry comes from [`understory_hull`]. The host supplies member geometry
//! through [`MemberSource`], the pan/zoom mapping through [`ViewTransform`],
//! and label metrics through [`TextMeasure`]; none of it is stored here.
//!
//! ## Minimal example
//!
//! ```rust
//! use hashbrown::HashMap;
//! use kurbo::{Affine, Point, Rect, Size};
//! use understory_frames::{Frames, MemberGeometry, NoLabels, Space};
//!
//! let mut nodes = HashMap::new();
//! nodes.insert("a", MemberGeometry::rect(Point::new(0.0, 0.0), Size::new(120.0, 80.0)));
//! nodes.insert("b", MemberGeometry::rect(Point::new(200.0, 40.0), Size::new(120.0, 80.0)));
//! nodes.insert("r", MemberGeometry::marker(Point::new(160.0, 200.0)));
//!
//! let mut frames = Frames::new();
//! let group = frames.add_frame(["a", "b", "r"], &nodes);
//!
//! // Once per draw: rebuild what changed, project what is on screen.
//! let view = Affine::scale(0.5);
//! let screen = Rect::new(0.0, 0.0, 800.0, 600.0);
//! let report = frames.update(&nodes, &view, &NoLabels, view.inverse().transform_rect_bbox(screen));
//! assert_eq!(report.rebuilt, [group]);
//! assert_eq!(report.visible, [group]);
//!
//! // Draw `bevelled()` back to front; pick front to back.
//! for frame in frames.back_to_front() {
//!     assert!(!frame.bevelled().is_empty());
//! }
//! assert_eq!(frames.point_in_frame(Point::new(80.0, 60.0), Space::Screen, &[]), Some(group));
//!
//! // Nothing moved: the next pass reuses every cached hull.
//! assert!(frames.update(&nodes, &view, &NoLabels, screen).rebuilt.is_empty());
//! ```
//!
//! ## Lifecycle
//!
//! - Frames are addressed by generational [`FrameId`]s. Ids of removed frames
//!   never match a later frame.
//! - A frame with no members left and no surviving subframes is removed at
//!   the end of the next [`Frames::update`]; so is a frame tagged with
//!   [`Frames::tag_remove`].
//! - Nesting that would create a cycle is refused with [`FrameError::Cycle`].
//!
//! ## Features
//!
//! - `std` (default): use the standard library for float math.
//! - `libm`: float math for `no_std` builds.
//! - `tracing`: emit `tracing` events for frame lifecycle and rebuilds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod frame;
mod frames;
mod host;
mod id;
mod label;
mod query;
mod update;

pub use config::FrameConfig;
pub use error::FrameError;
pub use frame::{Frame, FrameFlags};
pub use frames::Frames;
pub use host::{MemberGeometry, MemberKind, MemberSource, NoLabels, TextMeasure, ViewTransform};
pub use id::FrameId;
pub use label::{LabelPlacement, LabelPose, LabelSpec, place_label};
pub use query::Space;
pub use update::{FrameStats, UpdateReport};
