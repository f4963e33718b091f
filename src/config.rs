//! Renderer configuration.
//!
//! `RendererConfig` defines the coordinate space of the workspace (unit and
//! resolution), its extent, and the background painted behind all layers.
//! It provides sensible defaults via [`Default`], a fluent
//! [`RendererConfig::builder()`] with validation, and JSON loading.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use canvas_render::RendererConfig;
//! use canvas_render::coords::Unit;
//! let cfg = RendererConfig::default();
//! assert_eq!(cfg.unit, Unit::Point);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use canvas_render::RendererConfig;
//! use canvas_render::coords::{Resolution, Unit};
//! use canvas_render::render::{BackgroundStyle, Color};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RendererConfig::builder()
//!     .unit(Unit::Millimeter)
//!     .resolution(Resolution::uniform(96.0))
//!     .workspace_size(kurbo::Size::new(210.0, 297.0))
//!     .background(BackgroundStyle::Checkerboard {
//!         first: Color::WHITE,
//!         second: Color::LIGHT_GRAY,
//!         cell_size: 8,
//!     })
//!     .build()?;
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//! ```rust
//! use canvas_render::RendererConfig;
//! let json = r#"{ "unit": "inch", "resolution": { "x": 300.0, "y": 300.0 } }"#;
//! let cfg = RendererConfig::from_json_str(json).unwrap();
//! assert_eq!(cfg.resolution.x, 300.0);
//! ```
//!
//! # Errors
//!
//! Validation returns [`ConfigError`] for resolutions at or below
//! [`RESOLUTION_EPSILON`], empty or non-finite workspace sizes, and
//! background patterns with a zero cell size.

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::coords::{Resolution, Unit, RESOLUTION_EPSILON};
use crate::render::{BackgroundStyle, Color, MAX_CELL_SIZE};

/// A4 portrait in points.
const DEFAULT_WORKSPACE_SIZE: Size = Size::new(595.0, 842.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Unit of all workspace coordinates
    pub unit: Unit,
    /// Workspace pixels per inch
    pub resolution: Resolution,
    /// Extent of the workspace in `unit`, used for full invalidations
    pub workspace_size: Size,
    /// Background painted below all layers
    pub background: BackgroundStyle,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            unit: Unit::Point,
            resolution: Resolution::default(),
            workspace_size: DEFAULT_WORKSPACE_SIZE,
            background: BackgroundStyle::Solid(Color::WHITE),
        }
    }
}

impl RendererConfig {
    pub fn builder() -> RendererConfigBuilder {
        RendererConfigBuilder::default()
    }

    /// Parses and validates a JSON configuration. Missing fields take their
    /// default value.
    pub fn from_json_str(json: &str) -> Result<RendererConfig, ConfigError> {
        let cfg: RendererConfig = serde_json::from_str(json)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Builder for [`RendererConfig`].
#[derive(Debug, Clone, Default)]
pub struct RendererConfigBuilder {
    inner: RendererConfig,
}

impl RendererConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut RendererConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn unit(self, unit: Unit) -> Self { self.map(|c| c.unit = unit) }
    pub fn resolution(self, res: Resolution) -> Self { self.map(|c| c.resolution = res) }
    pub fn dpi(self, dpi: f64) -> Self { self.map(|c| c.resolution = Resolution::uniform(dpi)) }
    pub fn workspace_size(self, size: Size) -> Self { self.map(|c| c.workspace_size = size) }
    pub fn background(self, style: BackgroundStyle) -> Self { self.map(|c| c.background = style) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut RendererConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<RendererConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("resolution {0} is out of range (must be larger than 1e-6)")]
    InvalidResolution(f64),

    #[error("workspace size {width}x{height} must be finite and non-empty")]
    InvalidWorkspaceSize { width: f64, height: f64 },

    #[error("background cell size must be at least 1 pixel")]
    ZeroCellSize,

    #[error("background cell size {0} exceeds {max} pixels", max = MAX_CELL_SIZE)]
    CellSizeTooLarge(u32),

    #[error("cannot parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn validate(c: &RendererConfig) -> Result<(), ConfigError> {
    for dpi in [c.resolution.x, c.resolution.y] {
        if !dpi.is_finite() || dpi <= RESOLUTION_EPSILON {
            return Err(ConfigError::InvalidResolution(dpi));
        }
    }

    let size = c.workspace_size;
    if !size.is_finite() || size.width <= 0.0 || size.height <= 0.0 {
        return Err(ConfigError::InvalidWorkspaceSize {
            width: size.width,
            height: size.height,
        });
    }

    c.background.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RendererConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.resolution, Resolution::uniform(72.0));
        assert_eq!(cfg.workspace_size, Size::new(595.0, 842.0));
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = RendererConfig::builder()
            .unit(Unit::Inch)
            .dpi(300.0)
            .workspace_size(Size::new(8.5, 11.0))
            .background(BackgroundStyle::None)
            .build()
            .unwrap();
        assert_eq!(cfg.unit, Unit::Inch);
        assert_eq!(cfg.resolution, Resolution::uniform(300.0));
        assert_eq!(cfg.background, BackgroundStyle::None);
    }

    #[test]
    fn builder_rejects_bad_values() {
        assert!(matches!(
            RendererConfig::builder().dpi(0.0).build(),
            Err(ConfigError::InvalidResolution(_))
        ));
        assert!(matches!(
            RendererConfig::builder().workspace_size(Size::new(0.0, 10.0)).build(),
            Err(ConfigError::InvalidWorkspaceSize { .. })
        ));
        assert!(matches!(
            RendererConfig::builder()
                .background(BackgroundStyle::Grid {
                    background: Color::WHITE,
                    line: Color::BLACK,
                    cell_size: 0,
                })
                .build(),
            Err(ConfigError::ZeroCellSize)
        ));
        assert!(matches!(
            RendererConfig::builder()
                .background(BackgroundStyle::Checkerboard {
                    first: Color::WHITE,
                    second: Color::BLACK,
                    cell_size: u32::MAX,
                })
                .build(),
            Err(ConfigError::CellSizeTooLarge(u32::MAX))
        ));
    }

    #[test]
    fn json_uses_defaults_for_missing_fields() {
        let cfg = RendererConfig::from_json_str(r#"{ "unit": "millimeter" }"#).unwrap();
        assert_eq!(cfg.unit, Unit::Millimeter);
        assert_eq!(cfg.resolution, Resolution::default());
    }

    #[test]
    fn json_round_trip_keeps_background() {
        let cfg = RendererConfig::builder()
            .background(BackgroundStyle::Checkerboard {
                first: Color::WHITE,
                second: Color::BLACK,
                cell_size: 4,
            })
            .build()
            .unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(RendererConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(
            RendererConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RendererConfig::from_json_str(r#"{ "resolution": { "x": -1.0, "y": 72.0 } }"#),
            Err(ConfigError::InvalidResolution(_))
        ));
    }
}
