// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame arena: membership, hierarchy, and dirty propagation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::Vec2;

use crate::config::FrameConfig;
use crate::error::FrameError;
use crate::frame::{Frame, FrameFlags};
use crate::host::MemberSource;
use crate::id::FrameId;
use crate::label::{LabelPlacement, LabelSpec};
use crate::update::FrameStats;

#[derive(Clone, Debug)]
struct Slot<K> {
    generation: u32,
    frame: Option<Frame<K>>,
}

/// A collection of nestable frames over host-owned members of type `K`.
///
/// `Frames` owns frame identity, membership and hierarchy; the host owns the
/// members themselves and reports their geometry to each
/// [`update`](Self::update). Geometry is cached per frame and rebuilt only
/// when membership changes, a member moves, or a subframe's hull changes.
///
/// Membership is exclusive: assigning a member to one frame removes it from
/// every other frame.
///
/// ```rust
/// use hashbrown::HashMap;
/// use kurbo::{Affine, Point, Rect, Size};
/// use understory_frames::{FrameConfig, Frames, MemberGeometry, NoLabels, Space};
///
/// let mut nodes = HashMap::new();
/// nodes.insert(1_u32, MemberGeometry::rect(Point::new(0.0, 0.0), Size::new(10.0, 10.0)));
/// nodes.insert(2_u32, MemberGeometry::rect(Point::new(20.0, 0.0), Size::new(10.0, 10.0)));
///
/// let config = FrameConfig { padding: 0.0, ..FrameConfig::default() };
/// let mut frames = Frames::with_config(config);
/// let id = frames.add_frame([1, 2], &nodes);
///
/// let visible = Rect::new(-100.0, -100.0, 100.0, 100.0);
/// frames.update(&nodes, &Affine::IDENTITY, &NoLabels, visible);
///
/// assert_eq!(frames.point_in_frame(Point::new(15.0, 5.0), Space::View, &[]), Some(id));
/// assert_eq!(frames.point_in_frame(Point::new(15.0, 20.0), Space::View, &[]), None);
/// ```
#[derive(Clone, Debug)]
pub struct Frames<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    len: usize,
    /// Back-to-front draw order over every live frame.
    pub(crate) order: Vec<FrameId>,
    /// Frame count at the last reorder.
    pub(crate) ordered_len: usize,
    pub(crate) reorder_requested: bool,
    active: Option<FrameId>,
    pub(crate) config: FrameConfig,
    pub(crate) stats: FrameStats,
}

impl<K> Default for Frames<K>
where
    K: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Frames<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates an empty collection with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FrameConfig::default())
    }

    /// Creates an empty collection.
    #[must_use]
    pub fn with_config(config: FrameConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            order: Vec::new(),
            ordered_len: 0,
            reorder_requested: false,
            active: None,
            config,
            stats: FrameStats::default(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Replaces the configuration and schedules every frame for a rebuild.
    pub fn set_config(&mut self, config: FrameConfig) {
        self.config = config;
        for frame in self.frames_mut() {
            frame.flags |= FrameFlags::SHAPE_DIRTY | FrameFlags::LABEL_DIRTY;
        }
    }

    /// Cumulative recomputation counters.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Number of live frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no live frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live frame.
    #[must_use]
    pub fn contains(&self, id: FrameId) -> bool {
        self.frame(id).is_some()
    }

    /// Looks up a live frame.
    #[must_use]
    pub fn frame(&self, id: FrameId) -> Option<&Frame<K>> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.frame.as_ref()
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame<K>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.frame.as_mut()
    }

    fn live_mut(&mut self, id: FrameId) -> Result<&mut Frame<K>, FrameError> {
        self.frame_mut(id).ok_or(FrameError::UnknownFrame(id))
    }

    fn check(&self, id: FrameId) -> Result<(), FrameError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(FrameError::UnknownFrame(id))
        }
    }

    /// Iterates live frames in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame<K>> + '_ {
        self.slots.iter().filter_map(|s| s.frame.as_ref())
    }

    /// Ids of live frames in slot order.
    pub fn ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.iter().map(Frame::id)
    }

    pub(crate) fn frames_mut(&mut self) -> impl Iterator<Item = &mut Frame<K>> + '_ {
        self.slots.iter_mut().filter_map(|s| s.frame.as_mut())
    }

    fn insert(&mut self) -> FrameId {
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            FrameId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                frame: None,
            });
            FrameId::new(idx, 1)
        };
        self.slots[id.idx()].frame = Some(Frame::new(id));
        self.len += 1;
        self.order.push(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(frame = %id, "frame created");
        id
    }

    // --- membership ---

    /// Creates a frame around `members` and makes it active.
    ///
    /// Members are taken away from any frame that held them. Members whose
    /// parent member is also listed are left out. A frame created with no
    /// members is tagged for removal and disappears on the next update; use
    /// [`add_empty_frame`](Self::add_empty_frame) for a container.
    pub fn add_frame<S>(&mut self, members: impl IntoIterator<Item = K>, source: &S) -> FrameId
    where
        S: MemberSource<K> + ?Sized,
    {
        let members = filter_members(members, source);
        let id = self.insert();
        self.release_from_others(id, &members);
        if let Some(frame) = self.frame_mut(id) {
            if members.is_empty() {
                frame.flags |= FrameFlags::REMOVE;
            }
            frame.members = members;
        }
        self.activate(id);
        id
    }

    /// Creates a frame with no members that stays alive as a container.
    pub fn add_empty_frame(&mut self) -> FrameId {
        self.insert()
    }

    /// Like [`add_frame`](Self::add_frame), but nests the new frame inside
    /// the frame the members came from.
    ///
    /// Nesting happens when every member belonged to the same frame and that
    /// frame keeps at least one member of its own.
    pub fn group_members<S>(&mut self, members: impl IntoIterator<Item = K>, source: &S) -> FrameId
    where
        S: MemberSource<K> + ?Sized,
    {
        let members = filter_members(members, source);
        let mut owners = members.iter().map(|k| self.frame_of(*k));
        let host = match owners.next() {
            Some(Some(first)) if owners.all(|o| o == Some(first)) => self
                .frame(first)
                .filter(|f| f.members.len() > members.len())
                .map(Frame::id),
            _ => None,
        };
        let id = self.add_frame(members, source);
        if let Some(host) = host {
            self.attach(host, id);
        }
        id
    }

    /// Creates a container frame holding `frames` as its subframes.
    ///
    /// If every grouped frame shared one parent, the container takes their
    /// place under it.
    pub fn group_frames(&mut self, frames: &[FrameId]) -> Result<FrameId, FrameError> {
        for id in frames {
            self.check(*id)?;
        }
        let mut parents = frames.iter().map(|id| self.parent(*id));
        let shared = match parents.next() {
            Some(first) if parents.all(|p| p == first) => first,
            _ => None,
        };
        let container = self.insert();
        for id in frames {
            self.detach(*id);
            self.attach(container, *id);
        }
        if let Some(parent) = shared {
            self.attach(parent, container);
        }
        self.activate(container);
        Ok(container)
    }

    /// Replaces the members of `id`.
    ///
    /// An empty member list tags the frame for removal.
    pub fn set_members<S>(
        &mut self,
        id: FrameId,
        members: impl IntoIterator<Item = K>,
        source: &S,
    ) -> Result<(), FrameError>
    where
        S: MemberSource<K> + ?Sized,
    {
        self.check(id)?;
        let members = filter_members(members, source);
        self.release_from_others(id, &members);
        let frame = self.live_mut(id)?;
        if members.is_empty() {
            frame.flags |= FrameFlags::REMOVE;
        }
        frame.members = members;
        self.mark_shape_dirty(id);
        Ok(())
    }

    /// Adds members to `id`. Returns `true` if anything changed.
    pub fn add_members<S>(
        &mut self,
        id: FrameId,
        members: impl IntoIterator<Item = K>,
        source: &S,
    ) -> Result<bool, FrameError>
    where
        S: MemberSource<K> + ?Sized,
    {
        let current = self
            .frame(id)
            .ok_or(FrameError::UnknownFrame(id))?
            .members
            .clone();
        let merged = filter_members(current.iter().copied().chain(members), source);
        // A new parent member replaces its children, so compare contents.
        let changed = merged != current;
        if changed {
            self.release_from_others(id, &merged);
            self.live_mut(id)?.members = merged;
            self.mark_shape_dirty(id);
        }
        Ok(changed)
    }

    /// Removes members from `id`. Returns `true` if anything changed.
    pub fn remove_members(
        &mut self,
        id: FrameId,
        members: impl IntoIterator<Item = K>,
    ) -> Result<bool, FrameError> {
        let gone: HashSet<K> = members.into_iter().collect();
        let frame = self.live_mut(id)?;
        let before = frame.members.len();
        frame.members.retain(|k| !gone.contains(k));
        let changed = frame.members.len() != before;
        if changed {
            self.mark_shape_dirty(id);
        }
        Ok(changed)
    }

    /// Direct members of `id`.
    #[must_use]
    pub fn members(&self, id: FrameId) -> Option<&[K]> {
        self.frame(id).map(Frame::members)
    }

    /// Takes `members` out of their frames and hands them to each frame's
    /// parent. Members of top-level frames are simply dropped.
    pub fn release_members(&mut self, members: impl IntoIterator<Item = K>) {
        for key in members {
            let Some(owner) = self.frame_of(key) else {
                continue;
            };
            let parent = self.parent(owner);
            if let Some(frame) = self.frame_mut(owner) {
                frame.members.retain(|k| *k != key);
            }
            self.mark_shape_dirty(owner);
            if let Some(parent) = parent {
                if let Some(frame) = self.frame_mut(parent) {
                    frame.members.push(key);
                }
                self.mark_shape_dirty(parent);
            }
        }
    }

    fn release_from_others(&mut self, keep: FrameId, members: &[K]) {
        if members.is_empty() {
            return;
        }
        let taken: HashSet<K> = members.iter().copied().collect();
        let mut touched = Vec::new();
        for frame in self.frames_mut() {
            if frame.id == keep {
                continue;
            }
            let before = frame.members.len();
            frame.members.retain(|k| !taken.contains(k));
            if frame.members.len() != before {
                touched.push(frame.id);
            }
        }
        for id in touched {
            self.mark_shape_dirty(id);
        }
    }

    // --- hierarchy ---

    /// Nests `child` inside `parent`, detaching it from any previous parent.
    ///
    /// Both the old and the new parent are marked dirty. The child's own
    /// membership is untouched. Nesting that would make a frame its own
    /// ancestor is refused.
    pub fn add_subframe(&mut self, parent: FrameId, child: FrameId) -> Result<(), FrameError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(FrameError::SelfNesting(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            #[cfg(feature = "tracing")]
            tracing::warn!(parent = %parent, child = %child, "refused cyclic nesting");
            return Err(FrameError::Cycle { parent, child });
        }
        if self.parent(child) == Some(parent) {
            return Ok(());
        }
        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Un-nests `child` from `parent`. Returns `false` if it was not nested there.
    pub fn remove_subframe(&mut self, parent: FrameId, child: FrameId) -> Result<bool, FrameError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent(child) != Some(parent) {
            return Ok(false);
        }
        self.detach(child);
        Ok(true)
    }

    /// Moves `child` under `parent`, or to the top level for `None`.
    pub fn reparent(&mut self, child: FrameId, parent: Option<FrameId>) -> Result<(), FrameError> {
        match parent {
            Some(parent) => self.add_subframe(parent, child),
            None => {
                self.check(child)?;
                self.detach(child);
                Ok(())
            }
        }
    }

    /// Moves `id` one level up the hierarchy.
    ///
    /// A nested frame moves to its grandparent (or the top level); a
    /// top-level frame is tagged for removal, releasing its subframes.
    pub fn ungroup(&mut self, id: FrameId) -> Result<(), FrameError> {
        self.check(id)?;
        match self.parent(id) {
            Some(parent) => {
                let grandparent = self.parent(parent);
                self.detach(id);
                if let Some(grandparent) = grandparent {
                    self.attach(grandparent, id);
                }
            }
            None => {
                self.tag_remove(id);
            }
        }
        Ok(())
    }

    /// Direct subframes of `id`.
    #[must_use]
    pub fn subframes(&self, id: FrameId) -> Option<&[FrameId]> {
        self.frame(id).map(Frame::subframes)
    }

    /// The frame `id` is nested in.
    #[must_use]
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frame(id)?.parent
    }

    /// Walks up from `id` to its top-level frame, nearest first.
    ///
    /// Nesting is acyclic, so no chain is longer than the frame count.
    pub fn ancestors(&self, id: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        core::iter::successors(self.parent(id), |p| self.parent(*p)).take(self.len)
    }

    /// Every frame nested below `id`, depth first.
    #[must_use]
    pub fn descendants(&self, id: FrameId) -> Vec<FrameId> {
        let mut out = Vec::new();
        let mut stack: Vec<FrameId> = self
            .subframes(id)
            .map(|s| s.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(children) = self.subframes(next) {
                stack.extend(children.iter().rev().copied());
            }
        }
        out
    }

    /// Number of ancestors of `id`.
    pub(crate) fn depth(&self, id: FrameId) -> usize {
        self.ancestors(id).count()
    }

    /// Returns `true` if `ancestor` is `id` or lies on its parent chain.
    ///
    /// The walk is bounded by the frame count, which no acyclic chain exceeds.
    fn is_ancestor_or_self(&self, ancestor: FrameId, id: FrameId) -> bool {
        core::iter::successors(Some(id), |p| self.parent(*p))
            .take(self.len + 1)
            .any(|f| f == ancestor)
    }

    fn attach(&mut self, parent: FrameId, child: FrameId) {
        if let Some(frame) = self.frame_mut(child) {
            frame.parent = Some(parent);
        }
        if let Some(frame) = self.frame_mut(parent) {
            frame.subframes.push(child);
        }
        self.mark_shape_dirty(parent);
    }

    fn detach(&mut self, child: FrameId) {
        let Some(parent) = self.frame_mut(child).and_then(|f| f.parent.take()) else {
            return;
        };
        if let Some(frame) = self.frame_mut(parent) {
            frame.subframes.retain(|s| *s != child);
        }
        self.mark_shape_dirty(parent);
    }

    // --- dirty state & removal ---

    /// Marks the hull of `id` and of every ancestor stale.
    ///
    /// Returns `false` if `id` is not a live frame.
    pub fn mark_shape_dirty(&mut self, id: FrameId) -> bool {
        let Some(frame) = self.frame_mut(id) else {
            return false;
        };
        frame.flags |= FrameFlags::SHAPE_DIRTY;
        let chain: Vec<FrameId> = self.ancestors(id).collect();
        for ancestor in chain {
            if let Some(frame) = self.frame_mut(ancestor) {
                frame.flags |= FrameFlags::SHAPE_DIRTY;
            }
        }
        true
    }

    /// Marks the label of `id` stale.
    ///
    /// Labels anchored to the outline also mark the shape stale.
    pub fn mark_label_dirty(&mut self, id: FrameId) -> bool {
        let Some(frame) = self.frame_mut(id) else {
            return false;
        };
        frame.flags |= FrameFlags::LABEL_DIRTY;
        if frame.label.placement.follows_shape() {
            self.mark_shape_dirty(id);
        }
        true
    }

    /// Schedules `id` for removal at the end of the next update.
    pub fn tag_remove(&mut self, id: FrameId) -> bool {
        let Some(frame) = self.frame_mut(id) else {
            return false;
        };
        frame.flags |= FrameFlags::REMOVE;
        true
    }

    /// Removes frames immediately, by identity.
    ///
    /// Each removed frame is detached from its parent, which is marked dirty.
    /// Its subframes become top-level frames. Stale ids are skipped. Returns
    /// the ids actually removed.
    pub fn remove_frames(&mut self, ids: impl IntoIterator<Item = FrameId>) -> Vec<FrameId> {
        let mut removed = Vec::new();
        for id in ids {
            if !self.contains(id) {
                continue;
            }
            self.detach(id);
            let children: Vec<FrameId> = self
                .subframes(id)
                .map(<[FrameId]>::to_vec)
                .unwrap_or_default();
            for child in children {
                if let Some(frame) = self.frame_mut(child) {
                    frame.parent = None;
                }
            }
            self.slots[id.idx()].frame = None;
            self.free.push(id.slot());
            self.len -= 1;
            self.order.retain(|o| *o != id);
            if self.active == Some(id) {
                self.active = None;
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(frame = %id, "frame removed");
            removed.push(id);
        }
        removed
    }

    /// Removes every frame tagged for removal.
    pub fn apply_removals(&mut self) -> Vec<FrameId> {
        let tagged: Vec<FrameId> = self
            .iter()
            .filter(|f| f.is_tagged_for_removal())
            .map(Frame::id)
            .collect();
        self.remove_frames(tagged)
    }

    // --- labels ---

    /// Replaces all label settings of `id`.
    pub fn set_label(&mut self, id: FrameId, label: LabelSpec) -> Result<(), FrameError> {
        self.live_mut(id)?.label = label;
        self.mark_label_dirty(id);
        Ok(())
    }

    /// Sets the label text.
    pub fn set_label_text(&mut self, id: FrameId, text: impl Into<String>) -> Result<(), FrameError> {
        self.live_mut(id)?.label.text = text.into();
        self.mark_label_dirty(id);
        Ok(())
    }

    /// Sets the label font size.
    pub fn set_label_size(&mut self, id: FrameId, size: f64) -> Result<(), FrameError> {
        self.live_mut(id)?.label.size = size;
        self.mark_label_dirty(id);
        Ok(())
    }

    /// Sets where the label is anchored.
    pub fn set_label_placement(
        &mut self,
        id: FrameId,
        placement: LabelPlacement,
    ) -> Result<(), FrameError> {
        self.live_mut(id)?.label.placement = placement;
        self.mark_label_dirty(id);
        Ok(())
    }

    /// Sets the label nudge, in offset units.
    pub fn set_label_offset(&mut self, id: FrameId, offset: Vec2) -> Result<(), FrameError> {
        self.live_mut(id)?.label.offset = offset;
        self.mark_label_dirty(id);
        Ok(())
    }

    // --- active & selection ---

    /// Makes `id` the single active frame, or clears it for `None`.
    ///
    /// Activating a frame also selects it.
    pub fn set_active(&mut self, id: Option<FrameId>) -> Result<(), FrameError> {
        if let Some(id) = id {
            self.check(id)?;
            self.activate(id);
        } else if let Some(prev) = self.active.take() {
            if let Some(frame) = self.frame_mut(prev) {
                frame.flags.remove(FrameFlags::ACTIVE);
            }
        }
        Ok(())
    }

    fn activate(&mut self, id: FrameId) {
        if let Some(prev) = self.active.replace(id) {
            if let Some(frame) = self.frame_mut(prev) {
                frame.flags.remove(FrameFlags::ACTIVE);
            }
        }
        if let Some(frame) = self.frame_mut(id) {
            frame.flags |= FrameFlags::ACTIVE | FrameFlags::SELECTED;
        }
    }

    /// The active frame, if any.
    #[must_use]
    pub fn active(&self) -> Option<FrameId> {
        self.active
    }

    /// Replaces the selection. Unknown ids are refused before anything changes.
    pub fn set_selected(&mut self, ids: &[FrameId]) -> Result<(), FrameError> {
        for id in ids {
            self.check(*id)?;
        }
        for frame in self.frames_mut() {
            let on = ids.contains(&frame.id);
            frame.flags.set(FrameFlags::SELECTED, on);
        }
        Ok(())
    }

    /// Adds `id` to or removes it from the selection.
    pub fn select(&mut self, id: FrameId, selected: bool) -> Result<(), FrameError> {
        self.live_mut(id)?.flags.set(FrameFlags::SELECTED, selected);
        Ok(())
    }

    /// Selected frames in slot order.
    #[must_use]
    pub fn selected(&self) -> Vec<FrameId> {
        self.iter()
            .filter(|f| f.is_selected())
            .map(Frame::id)
            .collect()
    }

    /// Returns `true` if `id` is live and selected.
    #[must_use]
    pub fn is_selected(&self, id: FrameId) -> bool {
        self.frame(id).is_some_and(Frame::is_selected)
    }

    // --- dragging ---

    /// Members the host must move to drag `frames` as a whole.
    ///
    /// Frames nested inside another dragged frame are covered by it. The
    /// result holds the members of each dragged frame and all of its
    /// descendants, without members whose parent member is also moved. The
    /// dragged frames are marked dirty.
    pub fn translation_targets<S>(&mut self, frames: &[FrameId], source: &S) -> Vec<K>
    where
        S: MemberSource<K> + ?Sized,
    {
        let dragged: HashSet<FrameId> = frames.iter().copied().filter(|f| self.contains(*f)).collect();
        let roots: Vec<FrameId> = frames
            .iter()
            .copied()
            .filter(|f| dragged.contains(f))
            .filter(|f| !self.ancestors(*f).any(|a| dragged.contains(&a)))
            .collect();

        let mut keys = Vec::new();
        for root in &roots {
            let mut tree = self.descendants(*root);
            tree.insert(0, *root);
            for id in tree {
                if let Some(frame) = self.frame(id) {
                    keys.extend_from_slice(&frame.members);
                }
            }
        }
        let moved = filter_members(keys, source);
        for root in roots {
            self.mark_shape_dirty(root);
        }
        moved
    }
}

/// Dedups `members` in order and drops those whose parent member is listed.
fn filter_members<K, S>(members: impl IntoIterator<Item = K>, source: &S) -> Vec<K>
where
    K: Copy + Eq + Hash,
    S: MemberSource<K> + ?Sized,
{
    let mut seen = HashSet::new();
    let unique: Vec<K> = members.into_iter().filter(|k| seen.insert(*k)).collect();
    unique
        .into_iter()
        .filter(|k| source.parent(*k).is_none_or(|p| !seen.contains(&p)))
        .collect()
}
