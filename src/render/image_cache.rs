//! Single-entry raster cache of the last rendered viewport.
//!
//! The cache holds at most one [`CacheEntry`]: a private copy of the image
//! rendered for a `(zoom, viewport)` pair. Queries only succeed for exactly
//! the same zoom (bitwise float equality); the viewport may differ, in which
//! case the overlapping part is still usable.

use crate::errors::RenderError;
use crate::geometry::DeviceRect;
use crate::render::{RasterImage, Viewport};

/// The last fully rendered viewport image and what it is valid for.
///
/// `viewport.as_size() == image.size()` always holds.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    image: RasterImage,
    zoom: f64,
    viewport: Viewport,
}

impl CacheEntry {
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[derive(Debug, Default)]
pub struct ImageCache {
    entry: Option<CacheEntry>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    /// The entry, if it was rendered at exactly `zoom`.
    fn entry_at(&self, zoom: f64) -> Option<&CacheEntry> {
        self.entry.as_ref().filter(|e| e.zoom == zoom)
    }

    /// True when an entry exists at `zoom` whose viewport intersects `rect`.
    pub fn has_overlap(&self, zoom: f64, rect: DeviceRect) -> bool {
        self.entry_at(zoom)
            .map(|e| e.viewport.as_rect().intersects(&rect))
            .unwrap_or(false)
    }

    /// True when an entry exists at `zoom` whose viewport contains `rect`.
    pub fn is_fully_cached(&self, zoom: f64, rect: DeviceRect) -> bool {
        self.entry_at(zoom)
            .map(|e| e.viewport.as_rect().contains(&rect))
            .unwrap_or(false)
    }

    /// The part of `rect` the cache can provide at `zoom`; empty on a zoom
    /// mismatch or when nothing is cached.
    pub fn actual_region(&self, zoom: f64, rect: DeviceRect) -> DeviceRect {
        match self.entry_at(zoom) {
            Some(e) => rect.intersect(&e.viewport.as_rect()),
            None => DeviceRect::EMPTY,
        }
    }

    /// Copies the cached pixels of `region` into `destination`, which
    /// represents `viewport`. Returns the device rectangle that was copied,
    /// empty when the cache has nothing for `region` at `zoom`.
    pub fn blit_from(
        &self,
        destination: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        region: DeviceRect,
    ) -> DeviceRect {
        if region.is_degenerate() || !self.has_overlap(zoom, region) {
            return DeviceRect::EMPTY;
        }
        let Some(entry) = self.entry_at(zoom) else {
            return DeviceRect::EMPTY;
        };

        let intersection = region.intersect(&entry.viewport.as_rect());
        let src_rect = intersection.relative_to(entry.viewport.origin());
        let dst_origin = intersection.relative_to(viewport.origin()).origin();

        let written = destination.copy_from(&entry.image, src_rect, dst_origin);
        log::trace!("cache blit {intersection} -> {written}");

        intersection
    }

    /// Replaces the entry with a private copy of `image`, valid for
    /// `(zoom, viewport)`.
    pub fn update(
        &mut self,
        image: &RasterImage,
        zoom: f64,
        viewport: Viewport,
    ) -> Result<(), RenderError> {
        if image.size() != viewport.as_size() {
            return Err(RenderError::ImageSizeMismatch {
                image: image.size(),
                viewport: viewport.as_size(),
            });
        }

        log::debug!("cache updated for {viewport:?} at zoom {zoom}");
        self.entry = Some(CacheEntry {
            image: image.clone(),
            zoom,
            viewport,
        });
        Ok(())
    }

    /// Drops the entry. Idempotent.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;

    fn patterned(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::new(width, height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                img.set_pixel(x, y, [x as u8, y as u8, (x ^ y) as u8, 255]);
            }
        }
        img
    }

    #[test]
    fn empty_cache_answers_nothing() {
        let cache = ImageCache::new();
        let r = DeviceRect::new(0, 0, 10, 10);
        assert!(!cache.has_overlap(1.0, r));
        assert!(!cache.is_fully_cached(1.0, r));
        assert!(cache.actual_region(1.0, r).is_degenerate());

        let mut dst = RasterImage::new(10, 10);
        let copied = cache.blit_from(&mut dst, 1.0, &Viewport::new(0, 0, 10, 10), r);
        assert!(copied.is_degenerate());
    }

    #[test]
    fn update_rejects_size_mismatch() {
        let mut cache = ImageCache::new();
        let err = cache
            .update(&RasterImage::new(10, 10), 1.0, Viewport::new(0, 0, 10, 11))
            .unwrap_err();
        assert!(matches!(err, RenderError::ImageSizeMismatch { .. }));
        assert!(cache.entry().is_none());
    }

    #[test]
    fn every_sub_rect_is_fully_cached_after_update() {
        let mut cache = ImageCache::new();
        let vp = Viewport::new(20, 10, 40, 30);
        cache.update(&patterned(40, 30), 1.5, vp).unwrap();

        for r in [
            DeviceRect::new(20, 10, 40, 30),
            DeviceRect::new(21, 11, 5, 5),
            DeviceRect::new(59, 39, 1, 1),
        ] {
            assert!(cache.is_fully_cached(1.5, r), "{r:?} should be cached");
        }
        assert!(!cache.is_fully_cached(1.5, DeviceRect::new(19, 10, 5, 5)));
    }

    #[test]
    fn zoom_must_match_exactly() {
        let mut cache = ImageCache::new();
        let vp = Viewport::new(0, 0, 8, 8);
        cache.update(&patterned(8, 8), 1.0, vp).unwrap();

        assert!(cache.is_fully_cached(1.0, vp.as_rect()));
        assert!(!cache.is_fully_cached(1.0 + f64::EPSILON, vp.as_rect()));
        assert!(!cache.has_overlap(2.0, vp.as_rect()));
        assert!(cache.actual_region(0.5, vp.as_rect()).is_degenerate());
    }

    #[test]
    fn blit_reproduces_cached_pixels() {
        let mut cache = ImageCache::new();
        let vp = Viewport::new(100, 50, 32, 16);
        let img = patterned(32, 16);
        cache.update(&img, 2.0, vp).unwrap();

        let region = DeviceRect::new(110, 55, 8, 6);
        let mut dst = RasterImage::new(32, 16);
        let copied = cache.blit_from(&mut dst, 2.0, &vp, region);
        assert_eq!(copied, region);

        let local = region.relative_to(vp.origin());
        assert_eq!(dst.region_pixels(local), img.region_pixels(local));
        // untouched outside the region
        assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn blit_into_scrolled_viewport_uses_overlap_only() {
        let mut cache = ImageCache::new();
        let old_vp = Viewport::new(0, 0, 40, 20);
        let img = patterned(40, 20);
        cache.update(&img, 1.0, old_vp).unwrap();

        let new_vp = Viewport::new(10, 0, 40, 20);
        let mut dst = RasterImage::filled(40, 20, Color::BLACK);
        let copied = cache.blit_from(&mut dst, 1.0, &new_vp, new_vp.as_rect());
        assert_eq!(copied, DeviceRect::new(10, 0, 30, 20));

        // new-local (0, y) is old-local (10, y)
        assert_eq!(dst.pixel(0, 3), img.pixel(10, 3));
        assert_eq!(dst.pixel(29, 19), img.pixel(39, 19));
        // newly exposed strip untouched
        assert_eq!(dst.pixel(30, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn cache_owns_a_private_copy() {
        let mut cache = ImageCache::new();
        let vp = Viewport::new(0, 0, 4, 4);
        let mut img = RasterImage::filled(4, 4, Color::WHITE);
        cache.update(&img, 1.0, vp).unwrap();

        img.clear(Color::BLACK);
        assert_eq!(cache.entry().unwrap().image().pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut cache = ImageCache::new();
        cache.update(&RasterImage::new(2, 2), 1.0, Viewport::new(0, 0, 2, 2)).unwrap();
        cache.clear();
        cache.clear();
        assert!(cache.entry().is_none());
    }
}
