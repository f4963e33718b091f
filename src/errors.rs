use crate::geometry::DeviceRect;
use crate::render::SurfaceSize;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Canvas is empty")]
    EmptyCanvas,

    #[error("Canvas size {canvas:?} does not match viewport size {viewport:?}")]
    CanvasSizeMismatch {
        canvas: SurfaceSize,
        viewport: SurfaceSize,
    },

    #[error("Region {region:?} is not contained in viewport {viewport:?}")]
    RegionOutsideViewport {
        region: DeviceRect,
        viewport: DeviceRect,
    },

    #[error("Image size {image:?} does not match cached viewport size {viewport:?}")]
    ImageSizeMismatch {
        image: SurfaceSize,
        viewport: SurfaceSize,
    },

    #[error("Zoom must be finite and positive, got {0}")]
    InvalidZoom(f64),

    #[error("Resolution must be larger than zero, got {0}")]
    InvalidResolution(f64),

    #[error("Drawing failed: {0}")]
    Draw(#[source] anyhow::Error),
}
