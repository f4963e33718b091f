//! Coordinate mapping between workspace units, workspace pixels and device pixels.
//!
//! Three spaces are involved when rendering a workspace:
//!
//! - *workspace units*: resolution independent object coordinates (points,
//!   millimeters, ...), see [`Unit`];
//! - *workspace pixels*: units scaled by the [`Resolution`] (dots per inch);
//! - *device pixels*: workspace pixels multiplied by the zoom factor and
//!   shifted by the viewport origin. Device coordinates are integers.
//!
//! The free functions are pure and validate their parameters on every call.
//! [`CoordinateMapper`] validates once and then caches zoom, resolution,
//! unit and origin for call-site convenience.
//!
//! # Examples
//!
//! ```
//! use canvas_render::coords::{CoordinateMapper, Resolution, Unit};
//! use canvas_render::geometry::DevicePoint;
//! use kurbo::Point;
//!
//! // One inch at 96 dpi and 2x zoom is 192 device pixels.
//! let origin = DevicePoint::new(0, 0);
//! let mapper = CoordinateMapper::new(2.0, Resolution::uniform(96.0), Unit::Inch, origin).unwrap();
//! assert_eq!(mapper.to_device_point(Point::new(1.0, 1.0)), DevicePoint::new(192, 192));
//! ```

use crate::errors::RenderError;
use crate::geometry::{DevicePoint, DeviceRect};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Resolutions at or below this value are rejected.
pub const RESOLUTION_EPSILON: f64 = 1e-6;

/// Tolerance used when snapping fractional device coordinates to integers.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Mapped device coordinates are clamped to `±DEVICE_LIMIT`, so the width of
/// any mapped rectangle still fits an `i32`.
const DEVICE_LIMIT: f64 = (i32::MAX / 2) as f64;

/// Measurement unit of workspace coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Inch,
    /// Typographic point, 1/72 inch.
    Point,
    Millimeter,
    Centimeter,
    /// One workspace pixel. Not resolution independent.
    Pixel,
}

impl Unit {
    /// Units per inch, `None` for [`Unit::Pixel`].
    pub fn per_inch(&self) -> Option<f64> {
        match self {
            Unit::Inch => Some(1.0),
            Unit::Point => Some(72.0),
            Unit::Millimeter => Some(25.4),
            Unit::Centimeter => Some(2.54),
            Unit::Pixel => None,
        }
    }
}

/// Horizontal and vertical resolution in dots per inch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: f64,
    pub y: f64,
}

impl Resolution {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn uniform(dpi: f64) -> Self {
        Self { x: dpi, y: dpi }
    }

    pub(crate) fn validate(&self) -> Result<(), RenderError> {
        check_resolution(self.x)?;
        check_resolution(self.y)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

fn check_resolution(resolution: f64) -> Result<(), RenderError> {
    if !resolution.is_finite() || resolution <= RESOLUTION_EPSILON {
        return Err(RenderError::InvalidResolution(resolution));
    }
    Ok(())
}

pub(crate) fn check_zoom(zoom: f64) -> Result<(), RenderError> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(RenderError::InvalidZoom(zoom));
    }
    Ok(())
}

/// Workspace pixels per unit along one axis with the given resolution.
fn unit_scale(resolution: f64, unit: Unit) -> f64 {
    match unit.per_inch() {
        Some(per_inch) => resolution / per_inch,
        None => 1.0,
    }
}

fn snap_floor(v: f64) -> i32 {
    (v + SNAP_TOLERANCE).floor().clamp(-DEVICE_LIMIT, DEVICE_LIMIT) as i32
}

fn snap_ceil(v: f64) -> i32 {
    (v - SNAP_TOLERANCE).ceil().clamp(-DEVICE_LIMIT, DEVICE_LIMIT) as i32
}

/// Converts a length in workspace pixels into `unit`.
pub fn pixels_to_units(resolution: f64, pixels: f64, unit: Unit) -> Result<f64, RenderError> {
    check_resolution(resolution)?;
    Ok(pixels / unit_scale(resolution, unit))
}

/// Converts a length in `unit` into workspace pixels.
pub fn units_to_pixels(resolution: f64, value: f64, unit: Unit) -> Result<f64, RenderError> {
    check_resolution(resolution)?;
    Ok(value * unit_scale(resolution, unit))
}

/// Maps a workspace point to device pixels: units to workspace pixels, times
/// `zoom`, minus the viewport origin. The result is floored.
pub fn workspace_to_device(
    point: Point,
    zoom: f64,
    origin: DevicePoint,
    unit: Unit,
    resolution: Resolution,
) -> Result<DevicePoint, RenderError> {
    Ok(CoordinateMapper::new(zoom, resolution, unit, origin)?.to_device_point(point))
}

/// Inverse of [`workspace_to_device`].
pub fn device_to_workspace(
    point: DevicePoint,
    zoom: f64,
    origin: DevicePoint,
    unit: Unit,
    resolution: Resolution,
) -> Result<Point, RenderError> {
    Ok(CoordinateMapper::new(zoom, resolution, unit, origin)?.to_workspace_point(point))
}

/// Maps a workspace rectangle to the smallest device rectangle covering it.
pub fn workspace_rect_to_device(
    rect: Rect,
    zoom: f64,
    origin: DevicePoint,
    unit: Unit,
    resolution: Resolution,
) -> Result<DeviceRect, RenderError> {
    Ok(CoordinateMapper::new(zoom, resolution, unit, origin)?.to_device_rect(rect))
}

/// Maps a device rectangle back into workspace units.
pub fn device_rect_to_workspace(
    rect: DeviceRect,
    zoom: f64,
    origin: DevicePoint,
    unit: Unit,
    resolution: Resolution,
) -> Result<Rect, RenderError> {
    Ok(CoordinateMapper::new(zoom, resolution, unit, origin)?.to_workspace_rect(rect))
}

/// Cached mapping parameters for repeated conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    zoom: f64,
    resolution: Resolution,
    unit: Unit,
    origin: DevicePoint,
}

impl CoordinateMapper {
    pub fn new(
        zoom: f64,
        resolution: Resolution,
        unit: Unit,
        origin: DevicePoint,
    ) -> Result<Self, RenderError> {
        check_zoom(zoom)?;
        resolution.validate()?;
        Ok(Self {
            zoom,
            resolution,
            unit,
            origin,
        })
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn origin(&self) -> DevicePoint {
        self.origin
    }

    /// Same mapping with another viewport origin.
    pub fn with_origin(&self, origin: DevicePoint) -> Self {
        Self { origin, ..*self }
    }

    /// Device pixels per one horizontal unit of `unit`, zoom included.
    pub fn pixels_per_unit_x(&self, unit: Unit) -> f64 {
        unit_scale(self.resolution.x, unit) * self.zoom
    }

    /// Device pixels per one vertical unit of `unit`, zoom included.
    pub fn pixels_per_unit_y(&self, unit: Unit) -> f64 {
        unit_scale(self.resolution.y, unit) * self.zoom
    }

    fn device_x(&self, x: f64) -> f64 {
        x * self.pixels_per_unit_x(self.unit) - self.origin.x as f64
    }

    fn device_y(&self, y: f64) -> f64 {
        y * self.pixels_per_unit_y(self.unit) - self.origin.y as f64
    }

    pub fn to_device_point(&self, point: Point) -> DevicePoint {
        DevicePoint::new(snap_floor(self.device_x(point.x)), snap_floor(self.device_y(point.y)))
    }

    /// Smallest device rectangle covering `rect`. Edges round outward so
    /// every partially touched pixel is included.
    pub fn to_device_rect(&self, rect: Rect) -> DeviceRect {
        let rect = rect.abs();
        DeviceRect::from_edges(
            snap_floor(self.device_x(rect.x0)),
            snap_floor(self.device_y(rect.y0)),
            snap_ceil(self.device_x(rect.x1)),
            snap_ceil(self.device_y(rect.y1)),
        )
    }

    pub fn to_workspace_point(&self, point: DevicePoint) -> Point {
        Point::new(
            (point.x + self.origin.x) as f64 / self.pixels_per_unit_x(self.unit),
            (point.y + self.origin.y) as f64 / self.pixels_per_unit_y(self.unit),
        )
    }

    pub fn to_workspace_rect(&self, rect: DeviceRect) -> Rect {
        let p0 = self.to_workspace_point(rect.origin());
        let p1 = self.to_workspace_point(DevicePoint::new(rect.right(), rect.bottom()));
        Rect::from_points(p0, p1)
    }
}
