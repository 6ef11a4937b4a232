// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host application supplies to a [`Frames`](crate::Frames) pass.
//!
//! The frames collection never stores member geometry. Each pass asks a
//! [`MemberSource`] where members are now, a [`ViewTransform`] how view space
//! maps onto the screen, and a [`TextMeasure`] how large label text will be.

use core::hash::{BuildHasher, Hash};

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect, Size};

/// How a member contributes to its frame's hull.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A box; its padded corners are hulled.
    #[default]
    Rect,
    /// A point marker such as a reroute; a ring of samples around its
    /// location is hulled and its size is ignored.
    Marker,
}

/// Current placement of a member in view space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemberGeometry {
    /// Anchor corner of the member.
    pub location: Point,
    /// Extent from `location`. Components may be negative in y-up hosts.
    pub size: Size,
    /// Contribution kind.
    pub kind: MemberKind,
}

impl MemberGeometry {
    /// A rectangular member spanning `location` to `location + size`.
    #[must_use]
    pub fn rect(location: Point, size: Size) -> Self {
        Self {
            location,
            size,
            kind: MemberKind::Rect,
        }
    }

    /// A point marker at `location`.
    #[must_use]
    pub fn marker(location: Point) -> Self {
        Self {
            location,
            size: Size::ZERO,
            kind: MemberKind::Marker,
        }
    }

    /// Returns the normalized bounds of the member.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.location, self.location + self.size.to_vec2())
    }
}

/// Resolves opaque member keys to live geometry.
pub trait MemberSource<K> {
    /// Current geometry of `key`, or `None` if the member no longer exists.
    fn geometry(&self, key: K) -> Option<MemberGeometry>;

    /// The member `key` is nested in, if any.
    ///
    /// Members whose parent is in the same frame are covered by that parent
    /// and contribute nothing of their own.
    fn parent(&self, key: K) -> Option<K> {
        let _ = key;
        None
    }
}

impl<K, S> MemberSource<K> for HashMap<K, MemberGeometry, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn geometry(&self, key: K) -> Option<MemberGeometry> {
        self.get(&key).copied()
    }
}

impl<K, T: MemberSource<K> + ?Sized> MemberSource<K> for &T {
    fn geometry(&self, key: K) -> Option<MemberGeometry> {
        (**self).geometry(key)
    }

    fn parent(&self, key: K) -> Option<K> {
        (**self).parent(key)
    }
}

/// Maps between view space and screen space.
///
/// Pan and zoom change every draw, so a fresh transform is supplied to each
/// pass rather than stored.
pub trait ViewTransform {
    /// Maps a view-space point to the screen.
    fn view_to_screen(&self, pt: Point) -> Point;

    /// Maps a screen point back into view space.
    fn screen_to_view(&self, pt: Point) -> Point;

    /// Converts a screen-space extent to a view-space extent.
    fn screen_size_to_view(&self, size: Size) -> Size {
        let d = self.screen_to_view(Point::new(size.width, size.height))
            - self.screen_to_view(Point::ORIGIN);
        Size::new(d.x.abs(), d.y.abs())
    }

    /// Converts a screen rectangle (a viewport) to normalized view-space bounds.
    fn screen_rect_to_view(&self, rect: Rect) -> Rect {
        let a = self.screen_to_view(Point::new(rect.x0, rect.y0));
        let b = self.screen_to_view(Point::new(rect.x1, rect.y0));
        let c = self.screen_to_view(Point::new(rect.x0, rect.y1));
        let d = self.screen_to_view(Point::new(rect.x1, rect.y1));
        Rect::from_points(a, b).union_pt(c).union_pt(d)
    }
}

/// An affine transform is taken to map view space to screen space.
impl ViewTransform for Affine {
    fn view_to_screen(&self, pt: Point) -> Point {
        *self * pt
    }

    fn screen_to_view(&self, pt: Point) -> Point {
        self.inverse() * pt
    }
}

impl<T: ViewTransform + ?Sized> ViewTransform for &T {
    fn view_to_screen(&self, pt: Point) -> Point {
        (**self).view_to_screen(pt)
    }

    fn screen_to_view(&self, pt: Point) -> Point {
        (**self).screen_to_view(pt)
    }
}

/// Measures label text in screen units.
pub trait TextMeasure {
    /// Width and height of `text` drawn at `font_size`.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, f64) -> Size,
{
    fn measure(&self, text: &str, font_size: f64) -> Size {
        self(text, font_size)
    }
}

/// Text measurement for hosts that draw no labels; every string is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLabels;

impl TextMeasure for NoLabels {
    fn measure(&self, _text: &str, _font_size: f64) -> Size {
        Size::ZERO
    }
}
