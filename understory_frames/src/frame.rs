// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame record and its cached geometry.

use alloc::vec::Vec;

use kurbo::{Line, Point};
use smallvec::SmallVec;
use understory_hull::{Polygon, Triangle};

use crate::host::MemberGeometry;
use crate::id::FrameId;
use crate::label::{LabelPose, LabelSpec};

bitflags::bitflags! {
    /// Per-frame state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// The hull must be rebuilt on the next update.
        const SHAPE_DIRTY  = 0b0000_0001;
        /// The label must be placed again on the next update.
        const LABEL_DIRTY  = 0b0000_0010;
        /// The frame is removed at the end of the next update.
        const REMOVE       = 0b0000_0100;
        /// The frame is the active one.
        const ACTIVE       = 0b0000_1000;
        /// The frame is part of the selection.
        const SELECTED     = 0b0001_0000;
        /// The frame survived culling in the last update.
        const VISIBLE      = 0b0010_0000;
    }
}

impl Default for FrameFlags {
    fn default() -> Self {
        Self::SHAPE_DIRTY | Self::LABEL_DIRTY
    }
}

/// One frame: its membership, hierarchy links, and cached geometry.
///
/// Frames are owned by [`Frames`](crate::Frames) and mutated only through
/// it. All geometry below is as of the last
/// [`update`](crate::Frames::update).
#[derive(Clone, Debug)]
pub struct Frame<K> {
    pub(crate) id: FrameId,
    pub(crate) members: Vec<K>,
    pub(crate) subframes: SmallVec<[FrameId; 4]>,
    pub(crate) parent: Option<FrameId>,
    /// Member geometry seen by the last rebuild, in member order.
    pub(crate) snapshot: Vec<(K, MemberGeometry)>,
    pub(crate) shape: Polygon,
    pub(crate) center: Point,
    pub(crate) shape_region: Polygon,
    pub(crate) center_region: Point,
    pub(crate) bevelled: Polygon,
    pub(crate) label: LabelSpec,
    pub(crate) label_pose: LabelPose,
    pub(crate) flags: FrameFlags,
}

impl<K> Frame<K> {
    pub(crate) fn new(id: FrameId) -> Self {
        Self {
            id,
            members: Vec::new(),
            subframes: SmallVec::new(),
            parent: None,
            snapshot: Vec::new(),
            shape: Polygon::new(),
            center: Point::ORIGIN,
            shape_region: Polygon::new(),
            center_region: Point::ORIGIN,
            bevelled: Polygon::new(),
            label: LabelSpec::default(),
            label_pose: LabelPose::default(),
            flags: FrameFlags::default(),
        }
    }

    /// Identifier of this frame.
    #[must_use]
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Direct members, in insertion order.
    #[must_use]
    pub fn members(&self) -> &[K] {
        &self.members
    }

    /// Direct child frames.
    #[must_use]
    pub fn subframes(&self) -> &[FrameId] {
        &self.subframes
    }

    /// The frame this one is nested in.
    #[must_use]
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// Returns `true` if the frame has neither members nor subframes.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.members.is_empty() && self.subframes.is_empty()
    }

    /// Raw convex hull in view space. Used for hit testing.
    #[must_use]
    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    /// Mean of the hull vertices in view space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// The hull projected to the screen. Empty while the frame is culled.
    #[must_use]
    pub fn shape_region(&self) -> &Polygon {
        &self.shape_region
    }

    /// [`center`](Self::center) projected to the screen.
    #[must_use]
    pub fn center_region(&self) -> Point {
        self.center_region
    }

    /// Smoothed screen-space outline for drawing. Empty while culled.
    #[must_use]
    pub fn bevelled(&self) -> &Polygon {
        &self.bevelled
    }

    /// Fill triangles of the screen-space hull.
    #[must_use]
    pub fn fill_triangles(&self) -> Vec<Triangle> {
        self.shape_region.triangulate_around(self.center_region)
    }

    /// Edge segments of the screen-space hull.
    #[must_use]
    pub fn outline(&self) -> Vec<Line> {
        self.shape_region.edges().collect()
    }

    /// Absolute hull area in view space; the draw-order key.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.shape.area().abs()
    }

    /// Label settings.
    #[must_use]
    pub fn label(&self) -> &LabelSpec {
        &self.label
    }

    /// Resolved label position.
    #[must_use]
    pub fn label_pose(&self) -> LabelPose {
        self.label_pose
    }

    /// Label origin in view space.
    #[must_use]
    pub fn label_loc(&self) -> Point {
        self.label_pose.loc
    }

    /// Label rotation in radians.
    #[must_use]
    pub fn label_rot(&self) -> f64 {
        self.label_pose.rot
    }

    /// Current state bits.
    #[must_use]
    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    /// Returns `true` if this is the active frame.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.flags.contains(FrameFlags::ACTIVE)
    }

    /// Returns `true` if the frame is selected.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.flags.contains(FrameFlags::SELECTED)
    }

    /// Returns `true` if the hull is stale.
    #[must_use]
    pub fn is_shape_dirty(&self) -> bool {
        self.flags.contains(FrameFlags::SHAPE_DIRTY)
    }

    /// Returns `true` if the label pose is stale.
    #[must_use]
    pub fn is_label_dirty(&self) -> bool {
        self.flags.contains(FrameFlags::LABEL_DIRTY)
    }

    /// Returns `true` if the frame goes away at the end of the next update.
    #[must_use]
    pub fn is_tagged_for_removal(&self) -> bool {
        self.flags.contains(FrameFlags::REMOVE)
    }

    /// Returns `true` if the frame was on screen in the last update.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(FrameFlags::VISIBLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frames_start_dirty_and_empty() {
        let f: Frame<u32> = Frame::new(FrameId::new(0, 1));
        assert!(f.is_shape_dirty());
        assert!(f.is_label_dirty());
        assert!(!f.is_tagged_for_removal());
        assert!(!f.is_visible());
        assert!(f.is_vacant());
        assert!(f.shape().is_empty());
        assert!(f.fill_triangles().is_empty());
        assert!(f.outline().is_empty());
        assert_eq!(f.area(), 0.0);
    }
}
