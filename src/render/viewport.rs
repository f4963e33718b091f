//! Viewport definition for rendering.
//!
//! A [`Viewport`] is the window of the zoomed workspace that is currently
//! visible, in device pixels. Its `(x, y)` is the offset of the window into
//! the zoomed workspace (the device position of the workspace origin is
//! `(-x, -y)` inside the window) and `width`/`height` is the window size,
//! which must equal the size of the canvas rendered into.
//!
//! # Examples
//!
//! Scrolling a viewport:
//! ```
//! use canvas_render::render::Viewport;
//! use canvas_render::geometry::DeviceRect;
//!
//! let mut vp = Viewport::new(0, 0, 400, 300);
//! vp.translate(100, 0);
//! assert_eq!(vp.as_rect(), DeviceRect::new(100, 0, 400, 300));
//! ```

use crate::geometry::{DevicePoint, DeviceRect};
use crate::render::SurfaceSize;

/// Represents the viewport for rendering.
#[derive(Clone, Eq, PartialEq, Copy, Default)]
pub struct Viewport {
    /// Horizontal offset in device pixels from the workspace origin.
    pub x: i32,

    /// Vertical offset in device pixels from the workspace origin.
    pub y: i32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Viewport {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

impl Viewport {
    /// Creates a new [`Viewport`] with the given position and size.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Resizes the viewport to the given width and height.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Moves the viewport's origin to `(x, y)` in pixels.
    pub fn translate(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn origin(&self) -> DevicePoint {
        DevicePoint::new(self.x, self.y)
    }

    /// The viewport as a device rectangle.
    pub fn as_rect(&self) -> DeviceRect {
        DeviceRect::new(self.x, self.y, self.width as i32, self.height as i32)
    }

    /// True when the viewport covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.width < 1 || self.height < 1
    }

    /// Converts this viewport to a [`SurfaceSize`].
    pub fn as_size(&self) -> SurfaceSize {
        SurfaceSize {
            width: self.width,
            height: self.height,
        }
    }
}

impl From<DeviceRect> for Viewport {
    fn from(rect: DeviceRect) -> Self {
        Self::new(rect.x, rect.y, rect.width.max(0) as u32, rect.height.max(0) as u32)
    }
}
