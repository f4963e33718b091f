//! Incremental viewport rendering and caching for layered 2D vector canvases.
//!
//! A host control owns a [`CompositeRenderer`](render::CompositeRenderer),
//! hands it the ordered layers of the workspace, reports every change as an
//! invalidation and calls `render` once per repaint. The renderer keeps the
//! last rendered viewport image and only redraws what became invalid or
//! newly visible since then.

pub mod config;
pub mod coords;
pub mod errors;
pub mod geometry;
pub mod render;

pub use config::{ConfigError, RendererConfig};
pub use errors::RenderError;
