use crate::coords::CoordinateMapper;
use crate::geometry::DeviceRect;
use crate::render::{Color, RasterImage};
use kurbo::Rect;

/// Drawing surface handed to [`Drawable::draw`](crate::render::Drawable::draw).
///
/// All coordinates are canvas-local device pixels (the viewport origin is
/// already subtracted by the mapper) and every operation is clipped to the
/// region being redrawn, so objects cannot touch pixels outside of it.
pub struct DrawContext<'a> {
    canvas: &'a mut RasterImage,
    clip: DeviceRect,
    mapper: CoordinateMapper,
}

impl<'a> DrawContext<'a> {
    pub fn new(canvas: &'a mut RasterImage, clip: DeviceRect, mapper: CoordinateMapper) -> Self {
        let clip = clip.intersect(&canvas.bounds());
        Self { canvas, clip, mapper }
    }

    /// The clip rectangle in canvas-local pixels.
    pub fn clip(&self) -> DeviceRect {
        self.clip
    }

    /// Mapper from workspace units to canvas-local pixels.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Fills a canvas-local rectangle.
    pub fn fill_rect(&mut self, rect: DeviceRect, color: Color) {
        self.canvas.fill_rect(rect.intersect(&self.clip), color);
    }

    /// Fills a workspace rectangle.
    pub fn fill_workspace_rect(&mut self, rect: Rect, color: Color) {
        let device = self.mapper.to_device_rect(rect);
        self.fill_rect(device, color);
    }

    /// Strokes the outline of a workspace rectangle inwards with a line of
    /// `width` workspace units (at least one device pixel).
    pub fn stroke_workspace_rect(&mut self, rect: Rect, width: f64, color: Color) {
        let outer = self.mapper.to_device_rect(rect);
        if outer.is_degenerate() {
            return;
        }

        let unit = self.mapper.unit();
        let wx = ((width * self.mapper.pixels_per_unit_x(unit)).round() as i32).max(1);
        let wy = ((width * self.mapper.pixels_per_unit_y(unit)).round() as i32).max(1);
        if wx.saturating_mul(2) >= outer.width || wy.saturating_mul(2) >= outer.height {
            self.fill_rect(outer, color);
            return;
        }

        let inner_height = outer.height - 2 * wy;
        self.fill_rect(DeviceRect::new(outer.x, outer.y, outer.width, wy), color);
        self.fill_rect(DeviceRect::new(outer.x, outer.bottom() - wy, outer.width, wy), color);
        self.fill_rect(DeviceRect::new(outer.x, outer.y + wy, wx, inner_height), color);
        self.fill_rect(DeviceRect::new(outer.right() - wx, outer.y + wy, wx, inner_height), color);
    }
}

impl std::fmt::Debug for DrawContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawContext")
            .field("clip", &self.clip)
            .field("mapper", &self.mapper)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Resolution, Unit};
    use crate::geometry::DevicePoint;

    fn mapper(origin: DevicePoint) -> CoordinateMapper {
        CoordinateMapper::new(1.0, Resolution::uniform(72.0), Unit::Point, origin).unwrap()
    }

    #[test]
    fn fills_are_clipped() {
        let mut canvas = RasterImage::new(20, 20);
        {
            let clip = DeviceRect::new(5, 5, 5, 5);
            let mut ctx = DrawContext::new(&mut canvas, clip, mapper(DevicePoint::default()));
            ctx.fill_rect(DeviceRect::new(0, 0, 20, 20), Color::BLACK);
        }
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(9, 9), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(4, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn workspace_rects_are_shifted_by_origin() {
        let mut canvas = RasterImage::new(20, 20);
        {
            let clip = DeviceRect::new(0, 0, 20, 20);
            let mut ctx = DrawContext::new(&mut canvas, clip, mapper(DevicePoint::new(10, 0)));
            ctx.fill_workspace_rect(Rect::new(10.0, 0.0, 12.0, 2.0), Color::BLACK);
        }
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_leaves_interior_untouched() {
        let mut canvas = RasterImage::new(20, 20);
        {
            let clip = DeviceRect::new(0, 0, 20, 20);
            let mut ctx = DrawContext::new(&mut canvas, clip, mapper(DevicePoint::default()));
            ctx.stroke_workspace_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, Color::BLACK);
        }
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(9, 5), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 5), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn absurd_stroke_width_fills_the_rect() {
        let mut canvas = RasterImage::new(20, 20);
        {
            let clip = DeviceRect::new(0, 0, 20, 20);
            let mut ctx = DrawContext::new(&mut canvas, clip, mapper(DevicePoint::default()));
            ctx.stroke_workspace_rect(Rect::new(2.0, 2.0, 12.0, 12.0), 1e12, Color::BLACK);
        }
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(7, 7), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(12, 12), Some([0, 0, 0, 0]));
    }
}
