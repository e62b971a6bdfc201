//! Canvas type definitions: Gesture, HitTarget, HoverTarget.

use floorkit_core::{Point, ScreenPoint};

/// The pointer gesture currently captured by the canvas.
///
/// Only one gesture exists at a time; presses that arrive while one is
/// captured are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Drag rectangle in select mode.
    Lasso,
    /// Stage pan; `last` is the previous pointer position.
    StagePan { last: ScreenPoint, moved: bool },
    /// Device drag in move mode. `current` is the working position.
    DeviceDrag {
        id: String,
        origin: Point,
        current: Point,
        /// Device position minus the grab point, in normalized units.
        grab_offset: (f64, f64),
    },
    /// Vertex drag in edit mode.
    VertexDrag { index: usize },
    /// Rectangle being drawn between press and release.
    RectangleDraw,
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Lasso => "lasso",
            Gesture::StagePan { .. } => "stage-pan",
            Gesture::DeviceDrag { .. } => "device-drag",
            Gesture::VertexDrag { .. } => "vertex-drag",
            Gesture::RectangleDraw => "rectangle-draw",
        }
    }
}

/// What lies under the pointer, front-most first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A handle of the zone being edited.
    VertexHandle(usize),
    Device(String),
    Zone(String),
    Empty,
}

/// Entity the tooltip is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    Device(String),
    Zone(String),
}
