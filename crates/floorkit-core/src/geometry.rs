//! Geometry primitives.
//!
//! Two coordinate spaces meet in the canvas: normalized map space, where a
//! floor plan spans `[0,1]×[0,1]` regardless of zoom, and screen space in
//! viewport pixels. They get distinct types ([`Point`] and [`ScreenPoint`])
//! so a pixel value cannot be stored as a device position by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in normalized map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new normalized point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point with both axes clamped to `[0,1]`.
    pub fn clamped(self) -> Self {
        Self::new(self.x.clamp(0.0, 1.0), self.y.clamp(0.0, 1.0))
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Approximate equality within `eps` on both axes.
    pub fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// A position in viewport pixels (origin top-left, +Y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    /// Creates a new screen point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Pixel distance to another screen point.
    pub fn distance_to(&self, other: &ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Offset by a pixel delta.
    pub fn offset(&self, dx: f64, dy: f64) -> ScreenPoint {
        ScreenPoint::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}px, {:.1}px)", self.x, self.y)
    }
}

/// Axis-aligned pixel rectangle, always stored normalized (min <= max).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ScreenRect {
    /// Creates a rectangle from two opposite corners in any order.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Creates a rectangle from origin and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_corners(ScreenPoint::new(x, y), ScreenPoint::new(x + width, y + height))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grows the rectangle by `margin` pixels on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &ScreenRect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// Axis-aligned rectangle in normalized map space.
///
/// Unlike persisted points this is not clamped: the culler's padded view
/// rectangle routinely extends past the map edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl NormalizedRect {
    /// Creates a rectangle from two opposite corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Bounding rectangle of a point set, `None` when empty.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::from_corners(*first, *first);
        for p in iter {
            rect.min_x = rect.min_x.min(p.x);
            rect.min_y = rect.min_y.min(p.y);
            rect.max_x = rect.max_x.max(p.x);
            rect.max_y = rect.max_y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn intersects(&self, other: &NormalizedRect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// Where the floor-plan background is actually drawn inside the viewport.
///
/// Produced by the background renderer after aspect-fit centering; the
/// engine only consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl DisplayBounds {
    /// Creates display bounds; natural size defaults to the drawn size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            natural_width: width,
            natural_height: height,
        }
    }

    /// Sets the intrinsic size of the background asset.
    pub fn with_natural_size(mut self, natural_width: f64, natural_height: f64) -> Self {
        self.natural_width = natural_width;
        self.natural_height = natural_height;
        self
    }

    /// Aspect-fits an asset of `natural` size into a viewport, centered.
    pub fn aspect_fit(
        viewport_width: f64,
        viewport_height: f64,
        natural_width: f64,
        natural_height: f64,
    ) -> Self {
        if natural_width <= 0.0 || natural_height <= 0.0 {
            return Self::new(0.0, 0.0, viewport_width, viewport_height);
        }
        let scale = (viewport_width / natural_width).min(viewport_height / natural_height);
        let width = natural_width * scale;
        let height = natural_height * scale;
        Self::new(
            (viewport_width - width) / 2.0,
            (viewport_height - height) / 2.0,
            width,
            height,
        )
        .with_natural_size(natural_width, natural_height)
    }

    /// Bounds with a non-positive drawn size cannot anchor a transform.
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}
