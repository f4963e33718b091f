use crate::geometry::{DevicePoint, DeviceRect};
use crate::render::{Color, Viewport};

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<Viewport> for SurfaceSize {
    fn from(vp: Viewport) -> Self {
        Self {
            width: vp.width,
            height: vp.height,
        }
    }
}

const BYTES_PER_PIXEL: usize = 4;

/// Owned RGBA8 pixel buffer, rows top to bottom without padding.
///
/// Used both as the render target handed in by the host and as the private
/// snapshot held by the [`ImageCache`](crate::render::ImageCache).
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl RasterImage {
    /// Creates a fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut img = Self::new(width, height);
        img.clear(color);
        img
    }

    /// Wraps raw RGBA8 pixels.
    ///
    /// # Panics
    ///
    /// Panics when `pixels` is smaller than `width * height * 4` bytes.
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        assert!(
            pixels.len() >= width as usize * height as usize * BYTES_PER_PIXEL,
            "pixel buffer too small for image dimensions"
        );

        Self { pixels, width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// The image rectangle at the origin.
    pub fn bounds(&self) -> DeviceRect {
        DeviceRect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels[..self.width as usize * self.height as usize * BYTES_PER_PIXEL]
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.bounds().contains_point(DevicePoint::new(x, y)) {
            return None;
        }
        let o = self.offset(x, y);
        Some([self.pixels[o], self.pixels[o + 1], self.pixels[o + 2], self.pixels[o + 3]])
    }

    /// Writes one pixel. Out of bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if !self.bounds().contains_point(DevicePoint::new(x, y)) {
            return;
        }
        let o = self.offset(x, y);
        self.pixels[o..o + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Fills the whole image, replacing its content.
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Sets every pixel of `rect` (clipped) to `color` without blending.
    pub fn clear_rect(&mut self, rect: DeviceRect, color: Color) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_degenerate() {
            return;
        }

        let rgba = color.to_rgba8();
        for y in rect.top()..rect.bottom() {
            let start = self.offset(rect.left(), y);
            let end = self.offset(rect.right(), y);
            for px in self.pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Fills `rect`, clipped to the image. Opaque colors replace, translucent
    /// colors are blended source-over.
    pub fn fill_rect(&mut self, rect: DeviceRect, color: Color) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_degenerate() {
            return;
        }

        let rgba = color.to_rgba8();
        let opaque = rgba[3] == 255;
        for y in rect.top()..rect.bottom() {
            let start = self.offset(rect.left(), y);
            let end = self.offset(rect.right(), y);
            for px in self.pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                if opaque {
                    px.copy_from_slice(&rgba);
                } else {
                    blend_over(px, rgba);
                }
            }
        }
    }

    /// Copies `src_rect` of `src` into this image with its top-left corner at
    /// `dst`. Both sides are clipped; returns the destination rectangle that
    /// was actually written.
    pub fn copy_from(
        &mut self,
        src: &RasterImage,
        src_rect: DeviceRect,
        dst: DevicePoint,
    ) -> DeviceRect {
        let src_rect = src_rect.intersect(&src.bounds());
        if src_rect.is_degenerate() {
            return DeviceRect::EMPTY;
        }

        let dx = dst.x - src_rect.x;
        let dy = dst.y - src_rect.y;
        let dst_rect = src_rect.translate(dx, dy).intersect(&self.bounds());
        if dst_rect.is_degenerate() {
            return DeviceRect::EMPTY;
        }

        let row_len = dst_rect.width as usize * BYTES_PER_PIXEL;
        for y in dst_rect.top()..dst_rect.bottom() {
            let s = src.offset(dst_rect.left() - dx, y - dy);
            let d = self.offset(dst_rect.left(), y);
            self.pixels[d..d + row_len].copy_from_slice(&src.pixels[s..s + row_len]);
        }

        dst_rect
    }

    /// Returns a copy of the pixels of `rect` (clipped), row by row.
    pub fn region_pixels(&self, rect: DeviceRect) -> Vec<u8> {
        let rect = rect.intersect(&self.bounds());
        if rect.is_degenerate() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(rect.area() as usize * BYTES_PER_PIXEL);
        for y in rect.top()..rect.bottom() {
            let row = self.offset(rect.left(), y)..self.offset(rect.right(), y);
            out.extend_from_slice(&self.pixels[row]);
        }
        out
    }
}

fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    let inv = 255 - sa;
    for i in 0..3 {
        dst[i] = ((src[i] as u32 * sa + dst[i] as u32 * inv + 127) / 255) as u8;
    }
    dst[3] = (sa + (dst[3] as u32 * inv + 127) / 255) as u8;
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}
