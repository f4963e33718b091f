use std::rc::Rc;

use kurbo::Rect;

use crate::coords::{CoordinateMapper, Resolution, Unit};
use crate::errors::RenderError;
use crate::geometry::DeviceRect;
use crate::render::{DrawContext, LayerHandle, RasterImage, Viewport};

/// Draws the visible objects of one layer. Holds no cache of its own.
#[derive(Debug)]
pub struct LayerRenderer {
    layer: LayerHandle,
    unit: Unit,
    resolution: Resolution,
}

impl LayerRenderer {
    pub fn new(layer: LayerHandle, unit: Unit, resolution: Resolution) -> Self {
        Self {
            layer,
            unit,
            resolution,
        }
    }

    pub fn layer(&self) -> &LayerHandle {
        &self.layer
    }

    /// True when this renderer draws exactly `layer` (identity, not equality).
    pub fn renders(&self, layer: &LayerHandle) -> bool {
        Rc::ptr_eq(&self.layer, layer)
    }

    /// Draws every visible object whose device bounds intersect `region`.
    /// `region` is in device pixels and must lie inside `viewport`, which
    /// `canvas` represents.
    pub fn render(
        &self,
        canvas: &mut RasterImage,
        zoom: f64,
        viewport: &Viewport,
        region: DeviceRect,
    ) -> Result<(), RenderError> {
        let layer = self.layer.borrow();
        if !layer.is_visible() || layer.is_empty() {
            return Ok(());
        }

        let mapper = CoordinateMapper::new(zoom, self.resolution, self.unit, viewport.origin())?;
        let clip = region.relative_to(viewport.origin());
        let mut ctx = DrawContext::new(canvas, clip, mapper);

        let mut drawn = 0usize;
        for object in layer.objects.iter().filter(|o| o.is_visible()) {
            let device_bounds = mapper.to_device_rect(object.bounds());
            if !device_bounds.intersects(&clip) {
                continue;
            }
            object.draw(&mut ctx).map_err(|e| {
                RenderError::Draw(e.context(format!("drawing on layer '{}'", layer.name)))
            })?;
            drawn += 1;
        }

        log::trace!(
            "layer '{}': drew {drawn} of {} objects in {region}",
            layer.name,
            layer.objects.len()
        );
        Ok(())
    }

    /// Layers keep no cache; invalidation bookkeeping lives in the
    /// composite renderer.
    pub fn invalidate_layer_region(&mut self, _rect: Option<Rect>) {}
}
