// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by frame mutations.

use core::fmt;

use crate::id::FrameId;

/// Error returned when a frame mutation cannot be applied.
///
/// Nothing in this crate panics on bad input; operations that would corrupt
/// the hierarchy are refused and leave the collection unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The id does not refer to a live frame.
    UnknownFrame(FrameId),
    /// A frame was asked to contain itself.
    SelfNesting(FrameId),
    /// Nesting `child` under `parent` would make `child` its own ancestor.
    Cycle {
        /// The frame that would become the parent.
        parent: FrameId,
        /// The frame that would become the child.
        child: FrameId,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFrame(id) => write!(f, "{id} is not a live frame"),
            Self::SelfNesting(id) => write!(f, "{id} cannot be a subframe of itself"),
            Self::Cycle { parent, child } => write!(
                f,
                "nesting {child} under {parent} would create a cycle"
            ),
        }
    }
}

impl core::error::Error for FrameError {}
