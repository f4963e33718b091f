//! Workspace background painting.
//!
//! Patterned backgrounds are rendered once into a tile image holding a few
//! pattern periods horizontally and one period vertically. Filling an area
//! blits rows of that tile, so the pattern is computed only when the tile
//! must grow. The pattern is anchored at the workspace origin in device
//! pixels and therefore stays put while scrolling.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::geometry::{DevicePoint, DeviceRect};
use crate::render::{Color, RasterImage, Viewport};

/// Largest accepted pattern cell size in pixels.
pub const MAX_CELL_SIZE: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    /// Transparent pixels below the layers.
    None,
    /// One solid color.
    Solid(Color),
    /// Two-color checkerboard with square cells of `cell_size` pixels.
    Checkerboard { first: Color, second: Color, cell_size: u32 },
    /// One-pixel grid lines every `cell_size` pixels.
    Grid { background: Color, line: Color, cell_size: u32 },
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        BackgroundStyle::Solid(Color::WHITE)
    }
}

impl BackgroundStyle {
    /// Cell size of patterned styles.
    pub fn cell_size(&self) -> Option<u32> {
        match self {
            BackgroundStyle::Checkerboard { cell_size, .. }
            | BackgroundStyle::Grid { cell_size, .. } => Some(*cell_size),
            _ => None,
        }
    }

    /// Patterned styles need a cell size in `1..=MAX_CELL_SIZE`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.cell_size() {
            Some(0) => Err(ConfigError::ZeroCellSize),
            Some(size) if size > MAX_CELL_SIZE => Err(ConfigError::CellSizeTooLarge(size)),
            _ => Ok(()),
        }
    }

    /// Repeat distance of the pattern in pixels.
    fn period(&self) -> Option<i32> {
        match self {
            BackgroundStyle::Checkerboard { cell_size, .. } => Some(*cell_size as i32 * 2),
            BackgroundStyle::Grid { cell_size, .. } => Some(*cell_size as i32),
            _ => None,
        }
    }

    /// Pattern color at device position `(x, y)` of the zoomed workspace.
    fn pattern_color(&self, x: i32, y: i32) -> Color {
        match *self {
            BackgroundStyle::Checkerboard { first, second, cell_size } => {
                let cell = cell_size as i32;
                if (x.div_euclid(cell) + y.div_euclid(cell)) % 2 == 0 {
                    first
                } else {
                    second
                }
            }
            BackgroundStyle::Grid { background, line, cell_size } => {
                let cell = cell_size as i32;
                if x.rem_euclid(cell) == 0 || y.rem_euclid(cell) == 0 {
                    line
                } else {
                    background
                }
            }
            BackgroundStyle::Solid(color) => color,
            BackgroundStyle::None => Color::TRANSPARENT,
        }
    }
}

/// Paints a [`BackgroundStyle`], keeping the pattern tile between calls.
#[derive(Debug, Default)]
pub struct BackgroundPainter {
    style: BackgroundStyle,
    tile: Option<RasterImage>,
    tile_builds: u64,
}

impl BackgroundPainter {
    pub fn new(style: BackgroundStyle) -> Result<Self, ConfigError> {
        style.validate()?;
        Ok(Self {
            style,
            tile: None,
            tile_builds: 0,
        })
    }

    pub fn style(&self) -> &BackgroundStyle {
        &self.style
    }

    /// Takes effect on the next paint; the old tile is dropped. An invalid
    /// style is rejected and the current one kept.
    pub fn set_style(&mut self, style: BackgroundStyle) -> Result<(), ConfigError> {
        style.validate()?;
        if self.style != style {
            self.style = style;
            self.tile = None;
        }
        Ok(())
    }

    /// Width of the current pattern tile, if one was built.
    pub fn tile_width(&self) -> Option<u32> {
        self.tile.as_ref().map(|t| t.width())
    }

    /// How often the pattern tile was (re)built.
    pub fn tile_builds(&self) -> u64 {
        self.tile_builds
    }

    /// Paints `rect` (device pixels, inside `viewport`) of `canvas`.
    pub fn paint(&mut self, canvas: &mut RasterImage, viewport: &Viewport, rect: DeviceRect) {
        if rect.is_degenerate() {
            return;
        }

        // Always replaces, so painting an area twice gives the same pixels.
        let local = rect.relative_to(viewport.origin());
        match self.style {
            BackgroundStyle::None => canvas.clear_rect(local, Color::TRANSPARENT),
            BackgroundStyle::Solid(color) => canvas.clear_rect(local, color),
            BackgroundStyle::Checkerboard { .. } | BackgroundStyle::Grid { .. } => {
                self.paint_pattern(canvas, viewport, rect)
            }
        }
    }

    fn paint_pattern(&mut self, canvas: &mut RasterImage, viewport: &Viewport, rect: DeviceRect) {
        let Some(period) = self.style.period().filter(|p| *p > 0) else {
            return;
        };
        self.ensure_tile(rect.width, period);
        let Some(tile) = self.tile.as_ref() else {
            return;
        };

        let tx = rect.x.rem_euclid(period);
        let mut y = rect.top();
        while y < rect.bottom() {
            let ty = y.rem_euclid(period);
            let rows = (period - ty).min(rect.bottom() - y);
            canvas.copy_from(
                tile,
                DeviceRect::new(tx, ty, rect.width, rows),
                DevicePoint::new(rect.x - viewport.x, y - viewport.y),
            );
            y += rows;
        }
    }

    /// Makes sure the tile can serve rows of `width` pixels starting at any
    /// pattern phase. Only rebuilt when it has to grow.
    fn ensure_tile(&mut self, width: i32, period: i32) {
        let needed = (width + period + period - 1) / period * period;
        if self.tile_width().is_some_and(|w| w as i32 >= needed) {
            return;
        }

        let mut tile = RasterImage::new(needed as u32, period as u32);
        for y in 0..period {
            for x in 0..needed {
                tile.set_pixel(x, y, self.style.pattern_color(x, y).to_rgba8());
            }
        }
        log::trace!("background tile rebuilt at {needed}x{period}");
        self.tile = Some(tile);
        self.tile_builds += 1;
    }

    pub fn release_resources(&mut self) {
        self.tile = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: [u8; 4] = [255, 255, 255, 255];
    const B: [u8; 4] = [0, 0, 0, 255];

    fn checker(cell: u32) -> BackgroundStyle {
        BackgroundStyle::Checkerboard {
            first: Color::WHITE,
            second: Color::BLACK,
            cell_size: cell,
        }
    }

    #[test]
    fn solid_fills_rect_only() {
        let mut painter = BackgroundPainter::new(BackgroundStyle::Solid(Color::BLACK)).unwrap();
        let vp = Viewport::new(10, 10, 20, 20);
        let mut canvas = RasterImage::new(20, 20);
        painter.paint(&mut canvas, &vp, DeviceRect::new(15, 15, 5, 5));
        assert_eq!(canvas.pixel(5, 5), Some(B));
        assert_eq!(canvas.pixel(4, 5), Some([0, 0, 0, 0]));
        assert_eq!(painter.tile_builds(), 0);
    }

    #[test]
    fn none_clears_to_transparent() {
        let mut painter = BackgroundPainter::new(BackgroundStyle::None).unwrap();
        let vp = Viewport::new(0, 0, 4, 4);
        let mut canvas = RasterImage::filled(4, 4, Color::BLACK);
        painter.paint(&mut canvas, &vp, DeviceRect::new(0, 0, 2, 4));
        assert_eq!(canvas.pixel(1, 3), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(2, 0), Some(B));
    }

    #[test]
    fn translucent_solid_is_not_accumulated() {
        let translucent = Color::new(0.0, 0.0, 0.0, 0.5);
        let mut painter = BackgroundPainter::new(BackgroundStyle::Solid(translucent)).unwrap();
        let vp = Viewport::new(0, 0, 4, 4);
        let mut canvas = RasterImage::new(4, 4);
        painter.paint(&mut canvas, &vp, vp.as_rect());
        let once = canvas.clone();
        painter.paint(&mut canvas, &vp, vp.as_rect());
        assert_eq!(canvas, once);
    }

    #[test]
    fn checkerboard_matches_pattern_everywhere() {
        let style = checker(3);
        let mut painter = BackgroundPainter::new(style.clone()).unwrap();
        let vp = Viewport::new(-7, 5, 23, 17);
        let mut canvas = RasterImage::new(23, 17);
        painter.paint(&mut canvas, &vp, DeviceRect::new(-5, 6, 19, 15));

        for y in 6..21 {
            for x in -5..14 {
                let expected = style.pattern_color(x, y).to_rgba8();
                assert_eq!(canvas.pixel(x + 7, y - 5), Some(expected), "at device ({x}, {y})");
            }
        }
        // outside the painted rect nothing changed
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn pattern_is_anchored_to_workspace_when_scrolling() {
        let mut painter = BackgroundPainter::new(checker(2)).unwrap();
        let mut a = RasterImage::new(8, 8);
        let mut b = RasterImage::new(8, 8);
        let vp_a = Viewport::new(0, 0, 8, 8);
        let vp_b = Viewport::new(3, 1, 8, 8);
        painter.paint(&mut a, &vp_a, vp_a.as_rect());
        painter.paint(&mut b, &vp_b, vp_b.as_rect());

        // device (4, 3) is local (4, 3) in a and (1, 2) in b
        assert_eq!(a.pixel(4, 3), b.pixel(1, 2));
        assert_eq!(a.pixel(0, 0), Some(W));
        assert_eq!(a.pixel(2, 0), Some(B));
    }

    #[test]
    fn tile_is_rebuilt_only_when_it_must_grow() {
        let mut painter = BackgroundPainter::new(checker(4)).unwrap();
        let vp = Viewport::new(0, 0, 100, 20);
        let mut canvas = RasterImage::new(100, 20);

        painter.paint(&mut canvas, &vp, DeviceRect::new(0, 0, 50, 20));
        assert_eq!(painter.tile_builds(), 1);
        let first_width = painter.tile_width().unwrap();

        painter.paint(&mut canvas, &vp, DeviceRect::new(10, 0, 20, 20));
        painter.paint(&mut canvas, &vp, DeviceRect::new(0, 0, 50, 20));
        assert_eq!(painter.tile_builds(), 1);
        assert_eq!(painter.tile_width(), Some(first_width));

        painter.paint(&mut canvas, &vp, DeviceRect::new(0, 0, 100, 20));
        assert_eq!(painter.tile_builds(), 2);
        assert!(painter.tile_width().unwrap() > first_width);
    }

    #[test]
    fn grid_draws_lines_on_cell_boundaries() {
        let style = BackgroundStyle::Grid {
            background: Color::WHITE,
            line: Color::BLACK,
            cell_size: 5,
        };
        let mut painter = BackgroundPainter::new(style).unwrap();
        let vp = Viewport::new(0, 0, 12, 12);
        let mut canvas = RasterImage::new(12, 12);
        painter.paint(&mut canvas, &vp, vp.as_rect());
        assert_eq!(canvas.pixel(0, 3), Some(B));
        assert_eq!(canvas.pixel(10, 7), Some(B));
        assert_eq!(canvas.pixel(3, 5), Some(B));
        assert_eq!(canvas.pixel(3, 3), Some(W));
    }

    #[test]
    fn invalid_cell_sizes_are_rejected() {
        assert!(matches!(
            BackgroundPainter::new(checker(0)),
            Err(ConfigError::ZeroCellSize)
        ));

        let mut painter = BackgroundPainter::new(checker(4)).unwrap();
        assert!(matches!(
            painter.set_style(checker(MAX_CELL_SIZE + 1)),
            Err(ConfigError::CellSizeTooLarge(_))
        ));
        assert_eq!(painter.style(), &checker(4));
        assert!(painter.set_style(checker(MAX_CELL_SIZE)).is_ok());
    }

    #[test]
    fn changing_style_drops_tile() {
        let mut painter = BackgroundPainter::new(checker(4)).unwrap();
        let vp = Viewport::new(0, 0, 10, 10);
        let mut canvas = RasterImage::new(10, 10);
        painter.paint(&mut canvas, &vp, vp.as_rect());
        assert!(painter.tile_width().is_some());

        painter.set_style(BackgroundStyle::Solid(Color::BLACK)).unwrap();
        assert!(painter.tile_width().is_none());
        painter.paint(&mut canvas, &vp, vp.as_rect());
        assert_eq!(canvas.pixel(0, 0), Some(B));
    }
}
