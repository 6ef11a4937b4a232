// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame identifiers.

/// Identifier for a frame in a [`Frames`](crate::Frames) collection.
///
/// This is a small, copyable handle that stays stable while the frame is
/// alive, no matter how its members, subframes, or cached geometry change.
/// It consists of a slot index and a generation counter.
///
/// - On insert, a free slot is taken and its generation is bumped.
/// - On removal, the slot is freed; any `FrameId` pointing at it is now stale.
/// - Stale ids never alias a different live frame because the generation
///   must match. Lookups with a stale id return `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u32, pub(crate) u32);

impl FrameId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the slot index. Slots are reused after removal.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Returns the generation of the slot at the time this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl core::fmt::Display for FrameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "frame#{}v{}", self.0, self.1)
    }
}
