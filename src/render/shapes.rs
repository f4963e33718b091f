//! Built-in drawable shapes.
//!
//! Hosts normally bring their own [`Drawable`] implementations; these simple
//! shapes cover solid fills and rectangular frames.
//!
//! ```rust
//! use canvas_render::render::{Color, Layer, Shape};
//! use kurbo::Rect;
//!
//! let mut layer = Layer::new("annotations");
//! layer.push(Shape::fill(Rect::new(10.0, 10.0, 110.0, 60.0), Color::from_u8(255, 255, 0, 255)));
//! layer.push(Shape::frame(Rect::new(10.0, 10.0, 110.0, 60.0), 2.0, Color::BLACK));
//! ```

use kurbo::Rect;

use crate::render::{Color, DrawContext, Drawable};

#[derive(Clone, Debug)]
pub enum Shape {
    /// Filled rectangle.
    Fill {
        /// Rectangle in workspace units.
        rect: Rect,
        /// The color to fill the rectangle with.
        color: Color,
        visible: bool,
    },

    /// Rectangle outline drawn inside `rect`.
    Frame {
        /// Rectangle in workspace units.
        rect: Rect,
        /// Line width in workspace units.
        width: f64,
        /// The color of the outline.
        color: Color,
        visible: bool,
    },
}

impl Shape {
    pub fn fill(rect: Rect, color: Color) -> Self {
        Shape::Fill {
            rect,
            color,
            visible: true,
        }
    }

    pub fn frame(rect: Rect, width: f64, color: Color) -> Self {
        Shape::Frame {
            rect,
            width,
            color,
            visible: true,
        }
    }

    pub fn set_visible(&mut self, on: bool) {
        match self {
            Shape::Fill { visible, .. } | Shape::Frame { visible, .. } => *visible = on,
        }
    }
}

impl Drawable for Shape {
    fn bounds(&self) -> Rect {
        match self {
            Shape::Fill { rect, .. } | Shape::Frame { rect, .. } => rect.abs(),
        }
    }

    fn is_visible(&self) -> bool {
        match self {
            Shape::Fill { visible, .. } | Shape::Frame { visible, .. } => *visible,
        }
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) -> anyhow::Result<()> {
        match self {
            Shape::Fill { rect, color, .. } => ctx.fill_workspace_rect(*rect, *color),
            Shape::Frame { rect, width, color, .. } => {
                if !width.is_finite() || *width <= 0.0 {
                    anyhow::bail!("frame width must be positive, got {width}");
                }
                ctx.stroke_workspace_rect(*rect, *width, *color)
            }
        }
        Ok(())
    }
}
