//! Viewport and coordinate transformation for the floor-plan canvas.
//!
//! Handles conversion between normalized map coordinates and viewport pixels.
//! The background renderer reports where it actually drew the floor plan
//! ([`DisplayBounds`]); every conversion is anchored to that rectangle and then
//! scaled and panned by the stage transform.
//!
//! Formula:
//! ```text
//! base   = bounds.origin + point * bounds.size      (bounds known)
//! base   = point * viewport.size                    (bounds still loading)
//! screen = pan + scale * base
//! ```
//!
//! The fallback branch is a documented, temporary source of drift: until
//! the background reports its bounds, positions are stretched over the raw
//! viewport instead of the aspect-fit image.

use std::fmt;

use floorkit_core::{DisplayBounds, NormalizedRect, Point, ScreenPoint, ViewportState};

/// Default lower scale limit.
pub const MIN_SCALE: f64 = 0.1;
/// Default upper scale limit.
pub const MAX_SCALE: f64 = 10.0;
/// Step used by [`Viewport::zoom_in`] and [`Viewport::zoom_out`].
pub const ZOOM_STEP: f64 = 1.2;

/// Pan/zoom state plus everything needed to convert coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    state: ViewportState,
    viewport_width: f64,
    viewport_height: f64,
    display_bounds: Option<DisplayBounds>,
    min_scale: f64,
    max_scale: f64,
}

impl Viewport {
    /// Creates a viewport of the given pixel size at scale 1, no pan.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            state: ViewportState::default(),
            viewport_width,
            viewport_height,
            display_bounds: None,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }

    /// Overrides the scale limits. The current scale is re-clamped.
    ///
    /// Limits that are not positive, finite and ordered are ignored.
    pub fn with_scale_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        let usable = min_scale > 0.0 && max_scale.is_finite() && min_scale <= max_scale;
        if !usable {
            tracing::warn!(
                "Ignoring scale limits [{}, {}], keeping [{}, {}]",
                min_scale,
                max_scale,
                self.min_scale,
                self.max_scale
            );
            return self;
        }
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self.state.scale = self.clamp_scale(self.state.scale);
        self
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Sets the viewport pixel size (window/container resize).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
    }

    pub fn display_bounds(&self) -> Option<&DisplayBounds> {
        self.display_bounds.as_ref()
    }

    /// Stores the renderer's bounds. Unusable bounds count as "not known".
    pub fn set_display_bounds(&mut self, bounds: Option<DisplayBounds>) {
        self.display_bounds = bounds.filter(DisplayBounds::is_usable);
    }

    pub fn clear_display_bounds(&mut self) {
        self.display_bounds = None;
    }

    /// True while conversions use the raw-viewport fallback.
    pub fn is_fallback(&self) -> bool {
        self.display_bounds.is_none()
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Replaces pan and scale, clamping the scale.
    pub fn set_state(&mut self, state: ViewportState) {
        self.state = ViewportState {
            pan_offset: state.pan_offset,
            scale: self.clamp_scale(state.scale),
        };
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn pan_offset(&self) -> ScreenPoint {
        self.state.pan_offset
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Sets the scale (clamped) without moving the pan offset.
    pub fn set_scale(&mut self, scale: f64) {
        self.state.scale = self.clamp_scale(scale);
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.state.pan_offset = ScreenPoint::new(x, y);
    }

    /// Pans by a pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.state.pan_offset = self.state.pan_offset.offset(dx, dy);
    }

    /// Resets to scale 1 with no pan.
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        if !scale.is_finite() || scale <= 0.0 {
            return self.state.scale.clamp(self.min_scale, self.max_scale);
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Origin and size of the rectangle normalized space maps onto at scale 1.
    fn anchor(&self) -> (f64, f64, f64, f64) {
        match &self.display_bounds {
            Some(b) => (b.x, b.y, b.width, b.height),
            None => (0.0, 0.0, self.viewport_width, self.viewport_height),
        }
    }

    /// Converts a normalized point to viewport pixels.
    pub fn to_screen(&self, point: &Point) -> ScreenPoint {
        let (ox, oy, w, h) = self.anchor();
        let s = self.state.scale;
        let pan = self.state.pan_offset;
        ScreenPoint::new(
            pan.x + s * (ox + point.x * w),
            pan.y + s * (oy + point.y * h),
        )
    }

    /// Inverse of [`Viewport::to_screen`] without clamping.
    ///
    /// Used for drag deltas and the culling rectangle, which may leave the map.
    pub fn to_normalized_unclamped(&self, pixel: &ScreenPoint) -> Point {
        let (ox, oy, w, h) = self.anchor();
        let s = self.state.scale;
        let pan = self.state.pan_offset;
        let axis = |value: f64, pan: f64, origin: f64, size: f64| {
            if size <= 0.0 {
                0.0
            } else {
                ((value - pan) / s - origin) / size
            }
        };
        Point::new(axis(pixel.x, pan.x, ox, w), axis(pixel.y, pan.y, oy, h))
    }

    /// Converts viewport pixels to a normalized point, clamped to `[0,1]`.
    pub fn to_normalized(&self, pixel: &ScreenPoint) -> Point {
        self.to_normalized_unclamped(pixel).clamped()
    }

    /// Zooms by `factor` keeping the map point under `cursor` fixed on screen.
    ///
    /// Returns `false` when the clamped scale did not change.
    pub fn zoom_at(&mut self, cursor: ScreenPoint, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let old_scale = self.state.scale;
        let new_scale = (old_scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            return false;
        }

        // new_pan = cursor - (cursor - old_pan) * new_scale / old_scale
        let ratio = new_scale / old_scale;
        let pan = self.state.pan_offset;
        self.state = ViewportState {
            pan_offset: ScreenPoint::new(
                cursor.x - (cursor.x - pan.x) * ratio,
                cursor.y - (cursor.y - pan.y) * ratio,
            ),
            scale: new_scale,
        };
        true
    }

    fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }

    /// Zooms in one step around the viewport centre.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.center(), ZOOM_STEP)
    }

    /// Zooms out one step around the viewport centre.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.center(), 1.0 / ZOOM_STEP)
    }

    /// Pans so that `point` sits at the viewport centre.
    pub fn center_on(&mut self, point: &Point) {
        let (ox, oy, w, h) = self.anchor();
        let s = self.state.scale;
        let c = self.center();
        self.state.pan_offset =
            ScreenPoint::new(c.x - s * (ox + point.x * w), c.y - s * (oy + point.y * h));
    }

    /// Fits a normalized rectangle into the viewport.
    ///
    /// `padding` is the fraction of the viewport reserved on each side
    /// (0.0 - 0.45). Empty rectangles only re-centre.
    pub fn fit_to(&mut self, rect: &NormalizedRect, padding: f64) {
        let (_, _, w, h) = self.anchor();
        let padding_factor = 1.0 - padding.clamp(0.0, 0.45) * 2.0;
        let width_px = rect.width() * w;
        let height_px = rect.height() * h;

        if width_px > 0.0 && height_px > 0.0 {
            let scale_x = self.viewport_width * padding_factor / width_px;
            let scale_y = self.viewport_height * padding_factor / height_px;
            self.state.scale = self.clamp_scale(scale_x.min(scale_y));
        }

        let center = Point::new(
            (rect.min_x + rect.max_x) / 2.0,
            (rect.min_y + rect.max_y) / 2.0,
        );
        self.center_on(&center);
    }

    /// The normalized rectangle covered by the viewport grown by `padding_px`.
    pub fn visible_rect(&self, padding_px: f64) -> NormalizedRect {
        let top_left = self.to_normalized_unclamped(&ScreenPoint::new(-padding_px, -padding_px));
        let bottom_right = self.to_normalized_unclamped(&ScreenPoint::new(
            self.viewport_width + padding_px,
            self.viewport_height + padding_px,
        ));
        NormalizedRect::from_corners(top_left, bottom_right)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scale: {:.2}x | Pan: ({:.1}, {:.1}) | {}",
            self.state.scale,
            self.state.pan_offset.x,
            self.state.pan_offset.y,
            if self.is_fallback() {
                "raw viewport"
            } else {
                "display bounds"
            }
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
