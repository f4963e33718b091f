//! Layers of drawable objects.
//!
//! A [`Layer`] is an ordered, mutable list of [`Drawable`] objects plus its
//! visibility and lock flags. Layers are shared by identity between the host
//! and the renderers through a [`LayerHandle`]; editing a layer's content
//! does not require handing it to the renderer again, only an invalidation.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use bitflags::bitflags;
use kurbo::Rect;

use crate::render::DrawContext;

/// Anything that can be placed on a layer and drawn.
pub trait Drawable {
    /// Bounding rectangle in workspace units, including everything `draw`
    /// may touch.
    fn bounds(&self) -> Rect;

    /// Invisible objects are skipped without calling `draw`.
    fn is_visible(&self) -> bool {
        true
    }

    /// Draws the object. Only pixels inside `ctx.clip()` are kept.
    fn draw(&self, ctx: &mut DrawContext<'_>) -> anyhow::Result<()>;
}

bitflags! {
    pub struct LayerFlags: u8 {
        const VISIBLE = 0b0001;
        const LOCKED  = 0b0010;
    }
}

impl Default for LayerFlags {
    fn default() -> Self {
        LayerFlags::VISIBLE
    }
}

impl Display for LayerFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if self.contains(LayerFlags::VISIBLE) {
            parts.push("Visible");
        }
        if self.contains(LayerFlags::LOCKED) {
            parts.push("Locked");
        }

        if parts.is_empty() {
            write!(f, "None")
        } else {
            write!(f, "{}", parts.join("+"))
        }
    }
}

/// Shared, identity-carrying reference to a layer.
pub type LayerHandle = Rc<RefCell<Layer>>;

#[derive(Default)]
pub struct Layer {
    pub name: String,
    pub objects: Vec<Box<dyn Drawable>>,
    pub flags: LayerFlags,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            flags: LayerFlags::default(),
        }
    }

    /// Wraps the layer into a shareable handle.
    pub fn into_handle(self) -> LayerHandle {
        Rc::new(RefCell::new(self))
    }

    pub fn push(&mut self, object: impl Drawable + 'static) {
        self.objects.push(Box::new(object));
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(LayerFlags::VISIBLE)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(LayerFlags::VISIBLE, visible);
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.flags.set(LayerFlags::LOCKED, locked);
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Union of all object bounds, `None` for an empty layer.
    pub fn bounds(&self) -> Option<Rect> {
        self.objects
            .iter()
            .map(|o| o.bounds())
            .reduce(|acc, r| acc.union(r))
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("objects", &self.objects.len())
            .field("flags", &self.flags.to_string())
            .finish()
    }
}
