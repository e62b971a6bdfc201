//! Theme injected into the canvas.
//!
//! The canvas never reads colours from an ambient environment. The host
//! passes a [`Theme`] at construction and sends a replacement whenever its
//! own theme changes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// An sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (the `#` is optional).
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |s: &str| channel(s).map(|v| v * 17);
                Some(Self::rgb(
                    expand(&hex[0..1])?,
                    expand(&hex[1..2])?,
                    expand(&hex[2..3])?,
                ))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> ConfigResult<Self> {
        Color::parse(&value).ok_or(ConfigError::InvalidColor {
            key: "theme".to_string(),
            value,
        })
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Colours used by the render layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Default outline for zones without their own colour.
    pub zone_outline: Color,
    /// Zone fill opacity, `0.0..=1.0`.
    pub zone_fill_alpha: f64,
    /// Outline of the zone being edited.
    pub zone_editing: Color,
    pub device: Color,
    pub device_selected: Color,
    pub device_locked: Color,
    pub person: Color,
    pub lasso: Color,
    pub handle: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            zone_outline: Color::rgb(0x34, 0x98, 0xdb),
            zone_fill_alpha: 0.2,
            zone_editing: Color::rgb(0xf3, 0x9c, 0x12),
            device: Color::rgb(0x2c, 0x3e, 0x50),
            device_selected: Color::rgb(0xe7, 0x4c, 0x3c),
            device_locked: Color::rgb(0x7f, 0x8c, 0x8d),
            person: Color::rgb(0x27, 0xae, 0x60),
            lasso: Color::rgb(0x29, 0x80, 0xb9),
            handle: Color::rgb(0xff, 0xff, 0xff),
            tooltip_background: Color::rgb(0xff, 0xff, 0xff),
            tooltip_text: Color::rgb(0x22, 0x22, 0x22),
        }
    }

    pub fn dark() -> Self {
        Self {
            zone_outline: Color::rgb(0x5d, 0xad, 0xe2),
            zone_fill_alpha: 0.25,
            zone_editing: Color::rgb(0xf5, 0xb0, 0x41),
            device: Color::rgb(0xec, 0xf0, 0xf1),
            device_selected: Color::rgb(0xff, 0x6b, 0x5b),
            device_locked: Color::rgb(0x95, 0xa5, 0xa6),
            person: Color::rgb(0x58, 0xd6, 0x8d),
            lasso: Color::rgb(0x5d, 0xad, 0xe2),
            handle: Color::rgb(0x34, 0x49, 0x5e),
            tooltip_background: Color::rgb(0x2c, 0x3e, 0x50),
            tooltip_text: Color::rgb(0xec, 0xf0, 0xf1),
        }
    }

    /// Resolves a zone's own colour string, falling back to the theme outline.
    pub fn zone_color(&self, zone_color: &str) -> Color {
        Color::parse(zone_color).unwrap_or(self.zone_outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_and_short_hex() {
        assert_eq!(Color::parse("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::parse("f80"), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gg0000"), None);
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 255));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_zone_color_fallback() {
        let theme = Theme::dark();
        assert_eq!(theme.zone_color("#000000"), Color::rgb(0, 0, 0));
        assert_eq!(theme.zone_color("teal"), theme.zone_outline);
    }
}
