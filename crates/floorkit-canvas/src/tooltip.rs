//! Tooltip sizing and placement.
//!
//! Text is never measured. Wrapping is estimated from an average glyph
//! width of `0.6 * font_size`:
//!
//! ```text
//! chars_per_line = max(1, floor(max_width / (font_size * 0.6)))
//! wrapped_lines  = max(1, ceil(chars / chars_per_line))
//! height         = 2 * padding + header + divider + sum(wrapped_lines) * line_px
//! ```
//!
//! The box is placed below-right of the anchor, flipped to the other side on
//! overflow, then clamped into the viewport on both axes.

use serde::{Deserialize, Serialize};

use floorkit_core::{Device, ScreenPoint, ScreenRect, Zone};
use floorkit_settings::{TooltipDetailLevel, TooltipSettings};

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f64 = 0.6;

/// What a tooltip says.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: String,
    pub lines: Vec<String>,
    /// Optional trailing list, truncated to the configured cap.
    pub sub_list: Vec<String>,
}

impl TooltipContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn with_sub_list(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sub_list = items.into_iter().map(Into::into).collect();
        self
    }

    /// Content for a hovered device.
    ///
    /// `zones` are the zones whose polygon contains the device; only the
    /// detailed level lists them.
    pub fn for_device<'a>(
        device: &Device,
        level: TooltipDetailLevel,
        zones: impl IntoIterator<Item = &'a Zone>,
    ) -> Self {
        let mut content = Self::new(device.display_name());
        if level == TooltipDetailLevel::Minimal {
            return content;
        }

        content = content
            .with_line(format!("Type: {}", device.category))
            .with_line(if device.locked {
                "Status: locked"
            } else {
                "Status: movable"
            });

        if level == TooltipDetailLevel::Detailed {
            content = content
                .with_line(format!(
                    "Position: ({:.3}, {:.3})",
                    device.position.x, device.position.y
                ))
                .with_line(format!(
                    "Orientation: {:.0}\u{b0}",
                    device.orientation_degrees
                ))
                .with_sub_list(zones.into_iter().map(|z| {
                    if z.name.is_empty() {
                        z.id.clone()
                    } else {
                        z.name.clone()
                    }
                }));
        }
        content
    }

    /// Content for a hovered zone, listing the devices inside it.
    pub fn for_zone<'a>(
        zone: &Zone,
        level: TooltipDetailLevel,
        devices: impl IntoIterator<Item = &'a Device>,
    ) -> Self {
        let title = if zone.name.is_empty() {
            zone.id.as_str()
        } else {
            zone.name.as_str()
        };
        let mut content = Self::new(title);
        if level == TooltipDetailLevel::Minimal {
            return content;
        }
        let names: Vec<String> = devices
            .into_iter()
            .map(|d| d.display_name().to_string())
            .collect();
        content = content.with_line(format!("Devices: {}", names.len()));
        if level == TooltipDetailLevel::Detailed {
            content = content
                .with_line(format!("Corners: {}", zone.vertices().len()))
                .with_sub_list(names);
        }
        content
    }
}

/// One laid-out text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    pub text: String,
    /// Offset of the line's top from the box top.
    pub y_offset: f64,
    /// Estimated number of wrapped rows.
    pub rows: usize,
}

/// A sized and positioned tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub lines: Vec<TooltipLine>,
    pub flipped_x: bool,
    pub flipped_y: bool,
}

impl TooltipLayout {
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Computes tooltip boxes from content and an anchor point.
#[derive(Debug, Clone, Default)]
pub struct TooltipLayoutEngine {
    settings: TooltipSettings,
}

impl TooltipLayoutEngine {
    pub fn new(settings: TooltipSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TooltipSettings {
        &self.settings
    }

    fn glyph_width(&self) -> f64 {
        self.settings.font_size * GLYPH_WIDTH_FACTOR
    }

    fn line_px(&self) -> f64 {
        self.settings.font_size * self.settings.line_height
    }

    /// Characters that fit on one row, never less than one.
    pub fn chars_per_line(&self) -> usize {
        let glyph = self.glyph_width();
        if glyph <= 0.0 {
            return 1;
        }
        ((self.settings.max_width / glyph).floor() as usize).max(1)
    }

    /// Estimated rows for `text`. Empty text still takes one row.
    pub fn wrapped_rows(&self, text: &str) -> usize {
        let len = text.chars().count();
        len.div_ceil(self.chars_per_line()).max(1)
    }

    /// Fact lines followed by the capped sub-list and its "+k more" line.
    pub fn visible_lines(&self, content: &TooltipContent) -> Vec<String> {
        let cap = self.settings.sub_list_cap;
        let mut lines = content.lines.clone();
        lines.extend(content.sub_list.iter().take(cap).cloned());
        if content.sub_list.len() > cap {
            lines.push(format!("+{} more", content.sub_list.len() - cap));
        }
        lines
    }

    /// Sizes `content` and places it next to `anchor` inside a viewport of
    /// `viewport_width` x `viewport_height` pixels.
    pub fn layout(
        &self,
        content: &TooltipContent,
        anchor: ScreenPoint,
        viewport_width: f64,
        viewport_height: f64,
    ) -> TooltipLayout {
        let s = &self.settings;
        let line_px = self.line_px();
        let visible = self.visible_lines(content);

        let body_top = s.padding
            + s.header_height
            + if visible.is_empty() { 0.0 } else { s.divider_height };
        let mut cursor = body_top;
        let mut longest = content.title.chars().count();
        let lines: Vec<TooltipLine> = visible
            .into_iter()
            .map(|text| {
                let rows = self.wrapped_rows(&text);
                longest = longest.max(text.chars().count());
                let line = TooltipLine {
                    text,
                    y_offset: cursor,
                    rows,
                };
                cursor += rows as f64 * line_px;
                line
            })
            .collect();

        let height = cursor + s.padding;
        let width = (longest as f64 * self.glyph_width() + 2.0 * s.padding).min(s.max_width);

        let (x, flipped_x) = place_axis(anchor.x, width, s.offset, viewport_width);
        let (y, flipped_y) = place_axis(anchor.y, height, s.offset, viewport_height);

        TooltipLayout {
            x,
            y,
            width,
            height,
            title: content.title.clone(),
            lines,
            flipped_x,
            flipped_y,
        }
    }
}

/// Places a box of `size` after `anchor`, flipping before it on overflow and
/// clamping into `[0, limit]`.
fn place_axis(anchor: f64, size: f64, offset: f64, limit: f64) -> (f64, bool) {
    let after = anchor + offset;
    if after + size <= limit {
        return (after, false);
    }
    let before = anchor - offset - size;
    if before >= 0.0 {
        return (before, true);
    }
    // Fits neither side: pin to the viewport edge.
    let max = (limit - size).max(0.0);
    (after.clamp(0.0, max), false)
}
