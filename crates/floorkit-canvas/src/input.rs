//! Normalized input events.
//!
//! Hosts translate their platform pointer/keyboard/resize callbacks into
//! [`InputEvent`]s. Positions are viewport pixels; the canvas does all
//! coordinate conversion itself.

use serde::{Deserialize, Serialize};

use floorkit_core::{DisplayBounds, ScreenPoint};
use floorkit_settings::Theme;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Cmd on macOS, Super/Win elsewhere.
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        meta: false,
        alt: false,
    };

    /// Shift, Ctrl or Cmd: add to / toggle within the selection.
    pub fn is_union(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Keys the canvas reacts to; everything else arrives as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Delete,
    Backspace,
    Space,
    Other(String),
}

/// One input notification from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    PointerDown {
        position: ScreenPoint,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: ScreenPoint,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        position: ScreenPoint,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Double-click or double-tap.
    DoubleClick {
        position: ScreenPoint,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Wheel or pinch; negative `delta_y` zooms in.
    Wheel {
        position: ScreenPoint,
        delta_y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    KeyUp {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Viewport container resized.
    Resize { width: f64, height: f64 },
    /// Background renderer recomputed where it draws the floor plan.
    DisplayBoundsChanged { bounds: Option<DisplayBounds> },
    /// Host theme changed.
    ThemeChanged { theme: Theme },
    /// Whether a text-entry control currently holds keyboard focus.
    FocusChanged { text_entry: bool },
}

impl InputEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::PointerDown { .. } => "pointer-down",
            InputEvent::PointerMove { .. } => "pointer-move",
            InputEvent::PointerUp { .. } => "pointer-up",
            InputEvent::DoubleClick { .. } => "double-click",
            InputEvent::Wheel { .. } => "wheel",
            InputEvent::KeyDown { .. } => "key-down",
            InputEvent::KeyUp { .. } => "key-up",
            InputEvent::Resize { .. } => "resize",
            InputEvent::DisplayBoundsChanged { .. } => "display-bounds",
            InputEvent::ThemeChanged { .. } => "theme",
            InputEvent::FocusChanged { .. } => "focus",
        }
    }
}
