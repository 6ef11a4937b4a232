// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking, culling, and draw order.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};
use understory_hull::{Polygon, rect_contains_inclusive};

use crate::frame::Frame;
use crate::frames::Frames;
use crate::host::{MemberKind, MemberSource, ViewTransform};
use crate::id::FrameId;

/// Coordinate space of a query point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Space {
    /// View space; tested against [`Frame::shape`].
    #[default]
    View,
    /// Screen space; tested against [`Frame::shape_region`]. Frames culled
    /// in the last update never match.
    Screen,
}

impl Space {
    fn shape_of<K>(self, frame: &Frame<K>) -> &Polygon {
        match self {
            Self::View => &frame.shape,
            Self::Screen => &frame.shape_region,
        }
    }
}

impl<K> Frames<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Topmost frame whose hull contains `pt`, skipping `ignore`.
    ///
    /// Frames are tried front to back, so nested frames win over the frames
    /// around them. Frames tagged for removal are skipped.
    #[must_use]
    pub fn point_in_frame(&self, pt: Point, space: Space, ignore: &[FrameId]) -> Option<FrameId> {
        self.front_to_back()
            .filter(|f| !f.is_tagged_for_removal() && !ignore.contains(&f.id))
            .find(|f| space.shape_of(f).contains(pt))
            .map(Frame::id)
    }

    /// Topmost frame whose outline passes within `max_distance` of `pt`.
    #[must_use]
    pub fn point_on_frame_edge(&self, pt: Point, space: Space, max_distance: f64) -> Option<FrameId> {
        self.front_to_back()
            .filter(|f| !f.is_tagged_for_removal())
            .find(|f| space.shape_of(f).distance_to_nearest_edge(pt) < max_distance)
            .map(Frame::id)
    }

    /// [`point_on_frame_edge`](Self::point_on_frame_edge) in screen space with
    /// the configured [`edge_hit_threshold`](crate::FrameConfig::edge_hit_threshold).
    #[must_use]
    pub fn edge_hit(&self, screen_pt: Point) -> Option<FrameId> {
        self.point_on_frame_edge(screen_pt, Space::Screen, self.config.edge_hit_threshold)
    }

    /// [`edge_hit`](Self::edge_hit) that gives way to the members.
    ///
    /// Returns `None` when `screen_pt` lies on the box of any framed member,
    /// so a click on a node near a frame outline picks the node rather than
    /// the frame. Point markers have no box and never block.
    #[must_use]
    pub fn edge_hit_outside_members<S, V>(
        &self,
        screen_pt: Point,
        source: &S,
        view: &V,
    ) -> Option<FrameId>
    where
        S: MemberSource<K> + ?Sized,
        V: ViewTransform + ?Sized,
    {
        let view_pt = view.screen_to_view(screen_pt);
        let on_member = self
            .iter()
            .flat_map(|f| f.members.iter())
            .filter_map(|k| source.geometry(*k))
            .any(|g| g.kind == MemberKind::Rect && rect_contains_inclusive(g.bounds(), view_pt));
        if on_member {
            return None;
        }
        self.edge_hit(screen_pt)
    }

    /// Returns `true` if the view-space hull of `id` can be seen through
    /// `view_rect`.
    ///
    /// Unknown frames and frames with a zero-area hull are not visible.
    #[must_use]
    pub fn frustum_visible(&self, id: FrameId, view_rect: Rect) -> bool {
        self.frame(id)
            .is_some_and(|f| f.shape.intersects_rect(f.center, view_rect))
    }

    /// The frame holding `member` directly.
    ///
    /// A linear scan; frame counts are small.
    #[must_use]
    pub fn frame_of(&self, member: K) -> Option<FrameId> {
        self.iter()
            .find(|f| f.members.contains(&member))
            .map(Frame::id)
    }

    /// Sorts the draw order by hull area, largest first.
    ///
    /// Ties keep their previous relative order.
    pub fn reorder(&mut self) {
        let mut order = core::mem::take(&mut self.order);
        order.sort_by(|a, b| {
            let area = |id: &FrameId| self.frame(*id).map_or(0.0, Frame::area);
            area(b).partial_cmp(&area(a)).unwrap_or(Ordering::Equal)
        });
        self.order = order;
        self.ordered_len = self.len();
        self.reorder_requested = false;
        #[cfg(feature = "tracing")]
        tracing::trace!(frames = self.order.len(), "draw order refreshed");
    }

    /// Asks the next [`update`](Self::update) to refresh the draw order.
    pub fn request_reorder(&mut self) {
        self.reorder_requested = true;
    }

    /// Frame ids back to front.
    ///
    /// New frames are appended until the next reorder.
    #[must_use]
    pub fn draw_order(&self) -> &[FrameId] {
        &self.order
    }

    /// Frames back to front, for rendering.
    pub fn back_to_front(&self) -> impl DoubleEndedIterator<Item = &Frame<K>> + '_ {
        self.order.iter().filter_map(|id| self.frame(*id))
    }

    /// Frames front to back, for hit testing.
    pub fn front_to_back(&self) -> impl Iterator<Item = &Frame<K>> + '_ {
        self.back_to_front().rev()
    }
}
