//! Generic "redraw only what is needed" rendering.
//!
//! [`CachingRenderer`] keeps the last rendered viewport in an [`ImageCache`]
//! together with the workspace area reported dirty since then. On every
//! `render` it decides between a plain cache blit and a rebuild; a rebuild
//! blits whatever is still valid and hands only the dirty and newly exposed
//! areas to its pluggable [`AreaDrawer`].
//!
//! Coordinates: `viewport` and `region` are device pixels of the zoomed
//! workspace (so a viewport at `(100, 0)` shows the workspace scrolled by 100
//! device pixels); the canvas passed in represents exactly the viewport.

use kurbo::{Rect, Size};

use crate::config::RendererConfig;
use crate::coords::{check_zoom, CoordinateMapper, Resolution, Unit};
use crate::errors::RenderError;
use crate::geometry::{DevicePoint, DeviceRect};
use crate::render::{ImageCache, RasterImage, Viewport};

/// Produces the pixels of areas the cache cannot provide.
pub trait AreaDrawer {
    /// Draws everything visible inside `rect` (device pixels, contained in
    /// `viewport`) into `canvas`, which represents `viewport`.
    fn draw_noncached_area(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        rect: DeviceRect,
    ) -> Result<(), RenderError>;

    /// Releases any resources held for drawing.
    fn release_resources(&mut self) {}
}

/// Counters describing which paths renders took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Renders satisfied by a single cache blit.
    pub cache_hits: u64,
    /// Renders that rebuilt the viewport image.
    pub rebuilds: u64,
    /// Still valid pieces copied from the cache during rebuilds.
    pub blitted_pieces: u64,
    /// Calls into the area drawer.
    pub drawn_areas: u64,
}

pub struct CachingRenderer<D: AreaDrawer> {
    drawer: D,
    cache: ImageCache,
    /// Union of everything reported dirty since the last rebuild, in
    /// workspace units. `None` means nothing is known dirty.
    invalidated: Option<Rect>,
    unit: Unit,
    resolution: Resolution,
    workspace_size: Size,
    stats: RenderStats,
}

impl<D: AreaDrawer> CachingRenderer<D> {
    pub fn new(drawer: D, config: &RendererConfig) -> Self {
        Self {
            drawer,
            cache: ImageCache::new(),
            invalidated: None,
            unit: config.unit,
            resolution: config.resolution,
            workspace_size: config.workspace_size,
            stats: RenderStats::default(),
        }
    }

    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut D {
        &mut self.drawer
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    /// Accumulated dirty area in workspace units.
    pub fn invalidated_region(&self) -> Option<Rect> {
        self.invalidated
    }

    pub fn workspace_size(&self) -> Size {
        self.workspace_size
    }

    /// Changes the workspace extent and marks all of it dirty.
    pub fn set_workspace_size(&mut self, size: Size) {
        self.workspace_size = size;
        self.invalidate_region(None);
    }

    /// The full workspace in workspace units.
    pub fn workspace_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.workspace_size)
    }

    /// Adds `rect` (workspace units) to the dirty area; `None` marks the
    /// whole workspace dirty. Rectangles without area add nothing.
    pub fn invalidate_region(&mut self, rect: Option<Rect>) {
        let rect = rect.unwrap_or_else(|| self.workspace_rect()).abs();
        if !rect.is_finite() || rect.width() <= 0.0 || rect.height() <= 0.0 {
            log::trace!("ignoring invalidation without area: {rect:?}");
            return;
        }

        self.invalidated = Some(match self.invalidated {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    /// Makes `region` of `canvas` correct for `(zoom, viewport)`.
    ///
    /// Fails without touching any state when the canvas is empty, its size
    /// differs from the viewport, `region` is not inside the viewport or the
    /// zoom is not a positive finite number. Degenerate viewports or regions
    /// are a no-op.
    pub fn render(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        region: DeviceRect,
    ) -> Result<(), RenderError> {
        if viewport.is_degenerate() || region.is_degenerate() {
            return Ok(());
        }

        check_canvas(canvas, viewport)?;
        if !viewport.as_rect().contains(&region) {
            return Err(RenderError::RegionOutsideViewport {
                region,
                viewport: viewport.as_rect(),
            });
        }
        check_zoom(zoom)?;

        let invalidated = self.invalidated_device_rect(zoom)?;
        if region.intersects(&invalidated) || !self.cache.is_fully_cached(zoom, region) {
            log::debug!("rebuilding {viewport:?} at zoom {zoom} (dirty {invalidated})");
            return self.build_up_viewport_image(canvas, zoom, viewport, invalidated);
        }

        debug_assert!(
            self.cache.is_fully_cached(zoom, region),
            "cache hit for a region that is not cached"
        );
        let copied = self.cache.blit_from(canvas, zoom, viewport, region);
        debug_assert_eq!(copied, region, "cache hit must copy the whole region");
        self.stats.cache_hits += 1;
        Ok(())
    }

    /// The dirty area mapped to device pixels of the zoomed workspace.
    fn invalidated_device_rect(&self, zoom: f64) -> Result<DeviceRect, RenderError> {
        let Some(rect) = self.invalidated else {
            return Ok(DeviceRect::EMPTY);
        };
        let origin = DevicePoint::default();
        let mapper = CoordinateMapper::new(zoom, self.resolution, self.unit, origin)?;
        Ok(mapper.to_device_rect(rect))
    }

    fn build_up_viewport_image(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        invalidated: DeviceRect,
    ) -> Result<(), RenderError> {
        check_canvas(canvas, viewport)?;
        let viewport_rect = viewport.as_rect();

        let cached_region = self.cache.actual_region(zoom, viewport_rect);
        for piece in cached_region.difference(&invalidated) {
            self.cache.blit_from(canvas, zoom, viewport, piece);
            self.stats.blitted_pieces += 1;
        }

        let dirty = invalidated.intersect(&viewport_rect);
        if !dirty.is_degenerate() {
            self.draw_area(canvas, zoom, viewport, dirty)?;
        }

        // Overlap between `dirty` and the exposed pieces gets drawn twice.
        for piece in viewport_rect.difference(&cached_region) {
            let piece = piece.intersect(&viewport_rect);
            if !piece.is_degenerate() {
                self.draw_area(canvas, zoom, viewport, piece)?;
            }
        }

        self.invalidated = None;
        self.cache.update(canvas, zoom, *viewport)?;
        self.stats.rebuilds += 1;
        Ok(())
    }

    fn draw_area(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        rect: DeviceRect,
    ) -> Result<(), RenderError> {
        log::trace!("drawing non-cached area {rect}");
        self.stats.drawn_areas += 1;
        self.drawer
            .draw_noncached_area(canvas, zoom, viewport, rect)
            .inspect_err(|e| log::warn!("render of {viewport:?} aborted: {e}"))
    }

    /// Drops the cached image and the dirty area, and lets the drawer
    /// release its resources. The renderer stays usable.
    pub fn release_resources(&mut self) {
        self.cache.clear();
        self.invalidated = None;
        self.drawer.release_resources();
    }
}

impl<D: AreaDrawer> Drop for CachingRenderer<D> {
    fn drop(&mut self) {
        log::trace!("releasing caching renderer");
        self.release_resources();
    }
}

impl<D: AreaDrawer> std::fmt::Debug for CachingRenderer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingRenderer")
            .field("cache", &self.cache)
            .field("invalidated", &self.invalidated)
            .field("stats", &self.stats)
            .finish()
    }
}

fn check_canvas(canvas: &RasterImage, viewport: &Viewport) -> Result<(), RenderError> {
    if canvas.is_empty() {
        return Err(RenderError::EmptyCanvas);
    }
    if canvas.size() != viewport.as_size() {
        return Err(RenderError::CanvasSizeMismatch {
            canvas: canvas.size(),
            viewport: viewport.as_size(),
        });
    }
    Ok(())
}
