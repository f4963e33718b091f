//! Device-pixel geometry.
//!
//! All device-space math in the engine works on [`DeviceRect`], an integer
//! axis-aligned rectangle defined by its top-left corner and its size. A
//! rectangle with a width or height below `1` is *degenerate*: it covers no
//! pixels and is skipped by every blit and draw.
//!
//! Workspace-space geometry (resolution independent units) uses
//! [`kurbo::Rect`] instead; see [`crate::coords`] for the mapping between
//! the two.
//!
//! # Examples
//!
//! ```
//! use canvas_render::geometry::DeviceRect;
//!
//! let viewport = DeviceRect::new(0, 0, 400, 300);
//! let dirty = DeviceRect::new(50, 50, 20, 20);
//!
//! // Everything of the viewport that is not dirty, as disjoint bands.
//! let pieces = viewport.difference(&dirty);
//! assert_eq!(pieces.len(), 4);
//! ```

use std::fmt::{Debug, Display};

/// A point in device pixels.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct DevicePoint {
    pub x: i32,
    pub y: i32,
}

impl DevicePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Debug for DevicePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in device pixels.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct DeviceRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels. Values below `1` make the rectangle degenerate.
    pub width: i32,
    /// Height in pixels. Values below `1` make the rectangle degenerate.
    pub height: i32,
}

impl Debug for DeviceRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DeviceRect {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Display for DeviceRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

impl DeviceRect {
    /// The empty rectangle at the origin.
    pub const EMPTY: DeviceRect = DeviceRect {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rectangle from its left/top/right/bottom edges. Right and
    /// bottom are exclusive. Extents saturate at `i32::MAX`.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn origin(&self) -> DevicePoint {
        DevicePoint::new(self.x, self.y)
    }

    /// True when the rectangle covers no pixels.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Number of pixels covered, `0` for degenerate rectangles.
    pub fn area(&self) -> u64 {
        if self.is_degenerate() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Intersection of both rectangles. The result is degenerate when they
    /// do not overlap.
    pub fn intersect(&self, other: &DeviceRect) -> DeviceRect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return DeviceRect::new(left, top, 0, 0);
        }
        DeviceRect::from_edges(left, top, right, bottom)
    }

    pub fn intersects(&self, other: &DeviceRect) -> bool {
        !self.intersect(other).is_degenerate()
    }

    /// Smallest rectangle covering both. Degenerate inputs are ignored.
    pub fn union(&self, other: &DeviceRect) -> DeviceRect {
        if self.is_degenerate() {
            return *other;
        }
        if other.is_degenerate() {
            return *self;
        }
        DeviceRect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// True when `other` lies entirely inside this rectangle. A degenerate
    /// `other` is contained when its origin lies within the edges.
    pub fn contains(&self, other: &DeviceRect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn contains_point(&self, point: DevicePoint) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Moves the rectangle by `(dx, dy)`.
    pub fn translate(&self, dx: i32, dy: i32) -> DeviceRect {
        DeviceRect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Expresses the rectangle relative to `origin`.
    pub fn relative_to(&self, origin: DevicePoint) -> DeviceRect {
        self.translate(-origin.x, -origin.y)
    }

    /// Rectangle-set difference `self \ other`.
    ///
    /// Returns up to four pairwise disjoint rectangles whose union is the part
    /// of `self` not covered by `other`. Together with `self ∩ other` they
    /// reconstruct `self` exactly. The bands are produced in the order top,
    /// bottom, left, right: top and bottom span the full width of `self`,
    /// left and right only the vertical span of the intersection. Degenerate
    /// bands are omitted, so a degenerate `self` yields nothing.
    pub fn difference(&self, other: &DeviceRect) -> Vec<DeviceRect> {
        if self.is_degenerate() {
            return Vec::new();
        }

        let inter = self.intersect(other);
        if inter.is_degenerate() {
            return vec![*self];
        }

        let candidates = [
            DeviceRect::from_edges(self.left(), self.top(), self.right(), inter.top()),
            DeviceRect::from_edges(self.left(), inter.bottom(), self.right(), self.bottom()),
            DeviceRect::from_edges(self.left(), inter.top(), inter.left(), inter.bottom()),
            DeviceRect::from_edges(inter.right(), inter.top(), self.right(), inter.bottom()),
        ];

        candidates.into_iter().filter(|r| !r.is_degenerate()).collect()
    }
}
