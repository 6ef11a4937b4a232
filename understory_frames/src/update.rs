// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-draw update pass: change detection, lazy rebuilds, and culling.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Rect;
use understory_hull::{HullBuilder, Polygon};

use crate::frame::FrameFlags;
use crate::frames::Frames;
use crate::host::{MemberGeometry, MemberKind, MemberSource, TextMeasure, ViewTransform};
use crate::id::FrameId;
use crate::label::place_label;

/// Cumulative counters, for instrumentation and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Completed [`update`](Frames::update) passes.
    pub passes: u64,
    /// Hull rebuilds across all frames.
    pub shape_rebuilds: u64,
    /// Label placements across all frames.
    pub label_rebuilds: u64,
}

/// What one [`update`](Frames::update) pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Frames removed at the end of the pass.
    pub removed: Vec<FrameId>,
    /// Frames whose hull was rebuilt, deepest first.
    pub rebuilt: Vec<FrameId>,
    /// Frames on screen, back to front.
    pub visible: Vec<FrameId>,
}

impl<K> Frames<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Runs one draw pass.
    ///
    /// Frames are visited deepest first so that subframe hulls are current
    /// before their parents read them. For each frame the pass:
    /// 1. Drops members `source` no longer knows.
    /// 2. Schedules the frame for removal if tagged, or if nothing but
    ///    frames being removed is left inside it.
    /// 3. Compares the member list and each member's geometry against the
    ///    last snapshot, marking the shape dirty on any difference.
    /// 4. Rebuilds the hull when the shape is dirty, and places the label
    ///    when the shape or the label is dirty.
    ///
    /// Scheduled frames are then removed. Every remaining frame whose hull
    /// meets `visible` (a view-space rectangle) is projected to the screen
    /// through `view` and bevelled; the rest get empty screen geometry.
    /// Finally the draw order is refreshed if the frame count changed or a
    /// reorder was requested.
    ///
    /// Running a second pass with nothing changed rebuilds nothing.
    pub fn update<S, V, T>(&mut self, source: &S, view: &V, text: &T, visible: Rect) -> UpdateReport
    where
        S: MemberSource<K> + ?Sized,
        V: ViewTransform + ?Sized,
        T: TextMeasure + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("frames_update", frames = self.len());
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        let mut report = UpdateReport::default();
        let mut builder = HullBuilder::new(self.config.hull_params());

        let mut pass: Vec<(usize, FrameId)> = self.ids().map(|id| (self.depth(id), id)).collect();
        pass.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        for (_, id) in pass {
            if self.schedule_removal(id, source) {
                continue;
            }
            if self.detect_change(id, source) {
                self.mark_shape_dirty(id);
            }
            let Some(flags) = self.frame(id).map(|f| f.flags) else {
                continue;
            };
            if flags.contains(FrameFlags::SHAPE_DIRTY) {
                self.rebuild_shape(id, source, &mut builder);
                report.rebuilt.push(id);
            }
            if flags.intersects(FrameFlags::SHAPE_DIRTY | FrameFlags::LABEL_DIRTY) {
                self.rebuild_label(id, view, text);
            }
            if let Some(frame) = self.frame_mut(id) {
                frame.flags.remove(FrameFlags::SHAPE_DIRTY | FrameFlags::LABEL_DIRTY);
            }
        }

        report.removed = self.apply_removals();

        let bevel_radius = self.config.bevel_radius;
        let bevel_samples = self.config.bevel_samples;
        for frame in self.frames_mut() {
            let on_screen = frame.shape.intersects_rect(frame.center, visible);
            frame.flags.set(FrameFlags::VISIBLE, on_screen);
            if on_screen {
                frame.shape_region = frame.shape.transformed(|p| view.view_to_screen(p));
                frame.center_region = view.view_to_screen(frame.center);
                frame.bevelled = frame.shape_region.bevel_with(bevel_radius, bevel_samples);
            } else {
                frame.shape_region = Polygon::default();
                frame.bevelled = Polygon::default();
            }
        }

        if self.len() != self.ordered_len || self.reorder_requested {
            self.reorder();
        }
        report.visible = self
            .order
            .iter()
            .copied()
            .filter(|id| self.frame(*id).is_some_and(|f| f.is_visible()))
            .collect();

        self.stats.passes += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            rebuilt = report.rebuilt.len(),
            removed = report.removed.len(),
            visible = report.visible.len(),
            "frames updated"
        );
        report
    }

    /// Prunes stale members and decides whether `id` goes away this pass.
    ///
    /// A frame leaving this pass marks its parent dirty so the parent's hull
    /// stops including it.
    fn schedule_removal<S>(&mut self, id: FrameId, source: &S) -> bool
    where
        S: MemberSource<K> + ?Sized,
    {
        let live_subframes = self.frame(id).is_some_and(|f| {
            f.subframes
                .iter()
                .any(|s| self.frame(*s).is_some_and(|s| !s.is_tagged_for_removal()))
        });
        let Some(frame) = self.frame_mut(id) else {
            return true;
        };
        let before = frame.members.len();
        frame.members.retain(|k| source.geometry(*k).is_some());
        if frame.members.len() != before {
            frame.flags |= FrameFlags::SHAPE_DIRTY;
        }
        if frame.members.is_empty() && !live_subframes {
            frame.flags |= FrameFlags::REMOVE;
        }
        if !frame.is_tagged_for_removal() {
            return false;
        }
        let parent = frame.parent;
        if let Some(parent) = parent {
            self.mark_shape_dirty(parent);
        }
        true
    }

    /// Two-tier change check against the snapshot of the last rebuild.
    fn detect_change<S>(&self, id: FrameId, source: &S) -> bool
    where
        S: MemberSource<K> + ?Sized,
    {
        let Some(frame) = self.frame(id) else {
            return false;
        };
        if frame.is_shape_dirty() {
            return false;
        }
        if frame.members.len() != frame.snapshot.len() {
            return true;
        }
        frame
            .members
            .iter()
            .zip(&frame.snapshot)
            .any(|(key, (seen, geometry))| {
                key != seen || source.geometry(*key) != Some(*geometry)
            })
    }

    fn rebuild_shape<S>(&mut self, id: FrameId, source: &S, builder: &mut HullBuilder)
    where
        S: MemberSource<K> + ?Sized,
    {
        let Some(frame) = self.frame(id) else {
            return;
        };
        builder.clear();
        let in_frame: HashSet<K> = frame.members.iter().copied().collect();
        let mut snapshot: Vec<(K, MemberGeometry)> = Vec::with_capacity(frame.members.len());
        for key in &frame.members {
            let Some(geometry) = source.geometry(*key) else {
                continue;
            };
            snapshot.push((*key, geometry));
            if source.parent(*key).is_some_and(|p| in_frame.contains(&p)) {
                continue;
            }
            match geometry.kind {
                MemberKind::Rect => builder.push_rect(geometry.bounds()),
                MemberKind::Marker => builder.push_marker(geometry.location),
            }
        }
        for sub in &frame.subframes {
            if let Some(child) = self.frame(*sub).filter(|c| !c.is_tagged_for_removal()) {
                builder.push_subframe(&child.shape);
            }
        }

        let shape = builder.build();
        #[cfg(feature = "tracing")]
        tracing::trace!(frame = %id, vertices = shape.len(), "hull rebuilt");
        if let Some(frame) = self.frame_mut(id) {
            frame.center = shape.centroid();
            frame.shape = shape;
            frame.snapshot = snapshot;
        }
        self.stats.shape_rebuilds += 1;
    }

    fn rebuild_label<V, T>(&mut self, id: FrameId, view: &V, text: &T)
    where
        V: ViewTransform + ?Sized,
        T: TextMeasure + ?Sized,
    {
        let scale = self.config.label_offset_scale;
        let Some(frame) = self.frame_mut(id) else {
            return;
        };
        let measured = text.measure(&frame.label.text, frame.label.size);
        let dims = view.screen_size_to_view(measured);
        frame.label_pose = place_label(&frame.shape, frame.center, &frame.label, dims, scale);
        self.stats.label_rebuilds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;
    use kurbo::{Affine, Point, Size};

    use crate::config::FrameConfig;
    use crate::host::NoLabels;
    use crate::label::LabelPlacement;

    fn node(x: f64, y: f64) -> MemberGeometry {
        MemberGeometry::rect(Point::new(x, y), Size::new(10.0, 10.0))
    }

    fn everywhere() -> Rect {
        Rect::new(-1e4, -1e4, 1e4, 1e4)
    }

    fn unpadded() -> Frames<u32> {
        Frames::with_config(FrameConfig {
            padding: 0.0,
            ..FrameConfig::default()
        })
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        nodes.insert(2, node(20.0, 0.0));
        let mut frames = unpadded();
        let id = frames.add_frame([1, 2], &nodes);

        let first = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(first.rebuilt, [id]);
        let shape = frames.frame(id).unwrap().shape().clone();
        let stats = frames.stats();

        let second = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert!(second.rebuilt.is_empty());
        assert_eq!(frames.frame(id).unwrap().shape(), &shape);
        assert_eq!(frames.stats().shape_rebuilds, stats.shape_rebuilds);
        assert_eq!(frames.stats().label_rebuilds, stats.label_rebuilds);
        assert_eq!(frames.stats().passes, 2);
    }

    #[test]
    fn stale_members_are_dropped() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        nodes.insert(2, node(20.0, 0.0));
        let mut frames = unpadded();
        let id = frames.add_frame([1, 2], &nodes);
        frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());

        nodes.remove(&2);
        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(report.rebuilt, [id]);
        assert_eq!(frames.members(id), Some(&[1][..]));
        assert!((frames.frame(id).unwrap().area() - 100.0).abs() < 1e-9);

        nodes.remove(&1);
        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(report.removed, [id]);
        assert!(frames.is_empty());
    }

    #[test]
    fn subframes_are_rebuilt_before_parents() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        nodes.insert(2, node(200.0, 0.0));
        let mut frames = unpadded();
        let outer = frames.add_frame([1], &nodes);
        let inner = frames.add_frame([2], &nodes);
        frames.add_subframe(outer, inner).unwrap();

        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(report.rebuilt, [inner, outer]);
        let outer_shape = frames.frame(outer).unwrap().shape().clone();
        for v in frames.frame(inner).unwrap().shape().vertices() {
            assert!(outer_shape.contains(*v));
        }
        // Order: larger frames first.
        assert_eq!(frames.draw_order(), &[outer, inner]);
    }

    #[test]
    fn moves_deep_in_a_long_chain_reach_the_root() {
        let mut nodes = HashMap::new();
        let mut frames = unpadded();
        let mut chain = Vec::new();
        for k in 0..13_u32 {
            nodes.insert(k, node(f64::from(k) * 30.0, 0.0));
            chain.push(frames.add_frame([k], &nodes));
        }
        for pair in chain.windows(2) {
            frames.add_subframe(pair[0], pair[1]).unwrap();
        }
        frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        let root_area = frames.frame(chain[0]).unwrap().area();

        nodes.insert(12, node(5000.0, 0.0));
        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        let innermost_first: Vec<FrameId> = chain.iter().rev().copied().collect();
        assert_eq!(report.rebuilt, innermost_first);

        let root = frames.frame(chain[0]).unwrap();
        assert!(root.area() > root_area);
        for v in frames.frame(chain[12]).unwrap().shape().vertices() {
            assert!(root.shape().contains(*v), "{v:?} escapes the root hull");
        }
    }

    #[test]
    fn frames_emptied_this_pass_leave_the_parent_hull() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        nodes.insert(2, node(200.0, 0.0));
        let mut frames = unpadded();
        let outer = frames.add_frame([1], &nodes);
        let inner = frames.add_frame([2], &nodes);
        frames.add_subframe(outer, inner).unwrap();
        frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());

        nodes.remove(&2);
        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(report.removed, [inner]);
        assert!(report.rebuilt.contains(&outer));
        assert!((frames.frame(outer).unwrap().area() - 100.0).abs() < 1e-9);
        assert_eq!(frames.subframes(outer), Some(&[][..]));
    }

    #[test]
    fn containers_survive_while_children_live() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        let mut frames = unpadded();
        let container = frames.add_empty_frame();
        let child = frames.add_frame([1], &nodes);
        frames.add_subframe(container, child).unwrap();

        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert!(report.removed.is_empty());
        assert!(frames.frame(container).unwrap().area() > 100.0);

        frames.tag_remove(child);
        let report = frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        assert_eq!(report.removed.len(), 2);
        assert!(frames.is_empty());
    }

    #[test]
    fn culled_frames_have_no_screen_geometry() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        nodes.insert(2, node(1000.0, 0.0));
        let mut frames = unpadded();
        let near = frames.add_frame([1], &nodes);
        let far = frames.add_frame([2], &nodes);

        let view = Affine::scale(2.0);
        let report = frames.update(&nodes, &view, &NoLabels, Rect::new(-50.0, -50.0, 50.0, 50.0));
        assert_eq!(report.visible, [near]);

        let near = frames.frame(near).unwrap();
        assert!(near.is_visible());
        assert!((near.shape_region().area() - 400.0).abs() < 1e-9);
        assert_eq!(near.center_region(), Point::new(10.0, 10.0));
        assert_eq!(near.bevelled().len(), 4 * 4);
        assert_eq!(near.fill_triangles().len(), 4);

        let far = frames.frame(far).unwrap();
        assert!(!far.is_visible());
        assert!(far.shape_region().is_empty());
        assert!(far.bevelled().is_empty());
        assert!(!far.shape().is_empty());
    }

    #[test]
    fn markers_contribute_a_ring() {
        let mut nodes = HashMap::new();
        nodes.insert(1, MemberGeometry::marker(Point::new(0.0, 0.0)));
        let mut frames = Frames::new();
        let id = frames.add_frame([1], &nodes);
        frames.update(&nodes, &Affine::IDENTITY, &NoLabels, everywhere());
        let frame = frames.frame(id).unwrap();
        assert_eq!(frame.shape().len(), 12);
        assert!(frame.center().distance(Point::ORIGIN) < 1e-9);
    }

    #[test]
    fn labels_use_view_space_dimensions() {
        let mut nodes = HashMap::new();
        nodes.insert(1, node(0.0, 0.0));
        let mut frames = unpadded();
        let id = frames.add_frame([1], &nodes);
        frames
            .set_label_placement(id, LabelPlacement::Center)
            .unwrap();
        frames.set_label_text(id, "abcd").unwrap();

        // Four screen units per character at 2x zoom is two view units each.
        let measure = |text: &str, _size: f64| Size::new(text.len() as f64 * 4.0, 4.0);
        frames.update(&nodes, &Affine::scale(2.0), &measure, everywhere());
        let pose = frames.frame(id).unwrap().label_pose();
        assert!((pose.loc - Point::new(1.0, 4.0)).hypot() < 1e-9);
        assert_eq!(frames.stats().label_rebuilds, 1);

        // Label-only changes do not rebuild the hull.
        frames.set_label_text(id, "ab").unwrap();
        let report = frames.update(&nodes, &Affine::scale(2.0), &measure, everywhere());
        assert!(report.rebuilt.is_empty());
        assert_eq!(frames.stats().label_rebuilds, 2);
        let pose = frames.frame(id).unwrap().label_pose();
        assert!((pose.loc - Point::new(3.0, 4.0)).hypot() < 1e-9);
    }
}
