//! Background plus layers, cached.
//!
//! [`CompositeDrawer`] is the [`AreaDrawer`] that paints the background and
//! then every layer in order (painter's algorithm). [`CompositeRenderer`]
//! wires it into a [`CachingRenderer`] and is the type a host control talks
//! to:
//!
//! ```rust
//! use canvas_render::RendererConfig;
//! use canvas_render::render::{Color, CompositeRenderer, Layer, RasterImage, Shape, Viewport};
//! use kurbo::Rect;
//!
//! let mut renderer = CompositeRenderer::new(&RendererConfig::default()).unwrap();
//!
//! let mut layer = Layer::new("base");
//! layer.push(Shape::fill(Rect::new(10.0, 10.0, 50.0, 50.0), Color::BLACK));
//! let layer = layer.into_handle();
//! renderer.set_layers(&[layer.clone()]);
//!
//! let viewport = Viewport::new(0, 0, 100, 100);
//! let mut canvas = RasterImage::new(100, 100);
//! renderer.render(&mut canvas, 1.0, &viewport, viewport.as_rect()).unwrap();
//!
//! // after an edit the host reports the touched area
//! layer.borrow_mut().push(Shape::fill(Rect::new(60.0, 60.0, 70.0, 70.0), Color::BLACK));
//! renderer.invalidate_layer_region(Some(&layer), Some(Rect::new(60.0, 60.0, 70.0, 70.0)));
//! renderer.render(&mut canvas, 1.0, &viewport, viewport.as_rect()).unwrap();
//! assert_eq!(canvas.pixel(65, 65), Some([0, 0, 0, 255]));
//! ```

use kurbo::{Rect, Size};

use crate::config::{ConfigError, RendererConfig};
use crate::coords::{Resolution, Unit};
use crate::errors::RenderError;
use crate::geometry::DeviceRect;
use crate::render::{
    AreaDrawer, BackgroundPainter, BackgroundStyle, CachingRenderer, ImageCache, LayerHandle,
    LayerRenderer, RasterImage, RenderStats, Viewport,
};

/// Draws the background and all layers of a non-cached area.
#[derive(Debug)]
pub struct CompositeDrawer {
    background: BackgroundPainter,
    layers: Vec<LayerRenderer>,
    unit: Unit,
    resolution: Resolution,
}

impl CompositeDrawer {
    pub fn new(config: &RendererConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            background: BackgroundPainter::new(config.background.clone())?,
            layers: Vec::new(),
            unit: config.unit,
            resolution: config.resolution,
        })
    }

    /// Replaces the child renderers with one per layer, in order.
    pub fn set_layers(&mut self, layers: &[LayerHandle]) {
        self.layers.clear();
        self.layers.extend(
            layers
                .iter()
                .map(|layer| LayerRenderer::new(layer.clone(), self.unit, self.resolution)),
        );
    }

    pub fn layer_renderers(&self) -> &[LayerRenderer] {
        &self.layers
    }

    pub fn background(&self) -> &BackgroundPainter {
        &self.background
    }

    pub fn set_background(&mut self, style: BackgroundStyle) -> Result<(), ConfigError> {
        self.background.set_style(style)
    }

    fn invalidate_layer_region(&mut self, rect: Option<Rect>) {
        for layer in &mut self.layers {
            layer.invalidate_layer_region(rect);
        }
    }
}

impl AreaDrawer for CompositeDrawer {
    fn draw_noncached_area(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        rect: DeviceRect,
    ) -> Result<(), RenderError> {
        self.background.paint(canvas, viewport, rect);
        for layer in &self.layers {
            layer.render(canvas, zoom, viewport, rect)?;
        }
        Ok(())
    }

    fn release_resources(&mut self) {
        self.layers.clear();
        self.background.release_resources();
    }
}

/// Caching renderer of a layered workspace.
#[derive(Debug)]
pub struct CompositeRenderer {
    inner: CachingRenderer<CompositeDrawer>,
}

impl CompositeRenderer {
    pub fn new(config: &RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: CachingRenderer::new(CompositeDrawer::new(config)?, config),
        })
    }

    /// Binds the renderer to `layers`. Call whenever the layer collection
    /// itself changes (a layer added or removed), not for edits inside a
    /// layer. The cache is kept; report the affected area with
    /// [`invalidate_layer_region`](Self::invalidate_layer_region).
    pub fn set_layers(&mut self, layers: &[LayerHandle]) {
        log::debug!("binding {} layers", layers.len());
        self.inner.drawer_mut().set_layers(layers);
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerHandle> {
        self.inner.drawer().layer_renderers().iter().map(|r| r.layer())
    }

    /// Makes `region` of `canvas` correct. See [`CachingRenderer::render`].
    pub fn render(
        &mut self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        region: DeviceRect,
    ) -> Result<(), RenderError> {
        self.inner.render(canvas, zoom, viewport, region)
    }

    /// Reports `rect` (workspace units, `None` for the whole workspace) as
    /// changed. `layer` names the layer the change happened on; `None` means
    /// all layers.
    pub fn invalidate_layer_region(&mut self, layer: Option<&LayerHandle>, rect: Option<Rect>) {
        if let Some(layer) = layer {
            if !self.inner.drawer().layer_renderers().iter().any(|r| r.renders(layer)) {
                log::debug!("invalidation for unbound layer '{}'", layer.borrow().name);
            }
        }
        self.inner.drawer_mut().invalidate_layer_region(rect);
        self.inner.invalidate_region(rect);
    }

    pub fn background(&self) -> &BackgroundStyle {
        self.inner.drawer().background().style()
    }

    /// Changes the background for all areas drawn from now on. Invalidate to
    /// repaint areas that are already cached. Styles that fail validation
    /// leave the current background in place.
    pub fn set_background(&mut self, style: BackgroundStyle) -> Result<(), ConfigError> {
        self.inner.drawer_mut().set_background(style)
    }

    pub fn set_workspace_size(&mut self, size: Size) {
        self.inner.set_workspace_size(size);
    }

    pub fn invalidated_region(&self) -> Option<Rect> {
        self.inner.invalidated_region()
    }

    pub fn cache(&self) -> &ImageCache {
        self.inner.cache()
    }

    pub fn stats(&self) -> RenderStats {
        self.inner.stats()
    }

    pub fn reset_stats(&mut self) {
        self.inner.reset_stats();
    }

    /// Drops the cached image, the background tile and all layer renderers.
    /// Call [`set_layers`](Self::set_layers) again before the next render.
    pub fn release_resources(&mut self) {
        self.inner.release_resources();
    }
}
