//! Incremental viewport rendering.
//!
//! The pieces, leaves first: [`RasterImage`] pixel buffers, the single-entry
//! [`ImageCache`], the generic [`CachingRenderer`] that redraws only what
//! became invalid, the per-layer [`LayerRenderer`], and the
//! [`CompositeRenderer`] that paints the background and all layers.

mod background;
mod caching;
mod color;
mod composite;
mod image_cache;
mod layer;
mod layer_renderer;
mod painter;
mod raster;
mod shapes;
mod viewport;

pub use background::{BackgroundPainter, BackgroundStyle, MAX_CELL_SIZE};
pub use caching::{AreaDrawer, CachingRenderer, RenderStats};
pub use color::Color;
pub use composite::{CompositeDrawer, CompositeRenderer};
pub use image_cache::{CacheEntry, ImageCache};
pub use layer::{Drawable, Layer, LayerFlags, LayerHandle};
pub use layer_renderer::LayerRenderer;
pub use painter::DrawContext;
pub use raster::{RasterImage, SurfaceSize};
pub use shapes::Shape;
pub use viewport::Viewport;
