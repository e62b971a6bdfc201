//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so hosts can log or replay them.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, ScreenPoint};
use crate::model::InteractionMode;

/// Events produced by the canvas engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CanvasEvent {
    /// A new zone polygon was drawn and passed validation.
    ZoneCreated {
        /// Closed ring in normalized coordinates.
        polygon: Vec<Point>,
    },
    /// An existing zone's polygon was committed.
    ZoneUpdated {
        /// Zone id.
        id: String,
        /// Closed ring in normalized coordinates.
        polygon: Vec<Point>,
    },
    /// A device drag ended at a new position.
    DeviceMoved {
        /// Device id.
        id: String,
        /// Final normalized position.
        position: Point,
    },
    /// A device was rotated.
    DeviceRotated {
        /// Device id.
        id: String,
        /// New orientation in degrees, in `[0, 360)`.
        orientation_degrees: f64,
    },
    /// The observable selection changed.
    SelectionChanged {
        /// Selected device ids, ascending.
        device_ids: Vec<String>,
        /// Selected zone, if any.
        zone_id: Option<String>,
    },
    /// The interaction mode changed.
    ModeChanged {
        /// The new mode.
        mode: InteractionMode,
    },
    /// Pan or zoom changed; sibling views mirror this.
    ViewportChanged {
        /// New scale.
        scale: f64,
        /// New pan offset in pixels.
        pan_offset: ScreenPoint,
    },
    /// The user asked to delete an entity in delete mode.
    DeleteRequested {
        /// What should be deleted.
        target: DeleteTarget,
    },
    /// A rejected or ignored operation, with a user-facing message.
    Diagnostic {
        /// Severity.
        level: DiagnosticLevel,
        /// Message suitable for a toast or status line.
        message: String,
    },
}

impl CanvasEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            CanvasEvent::ZoneCreated { .. } | CanvasEvent::ZoneUpdated { .. } => {
                EventCategory::Zone
            }
            CanvasEvent::DeviceMoved { .. } | CanvasEvent::DeviceRotated { .. } => {
                EventCategory::Device
            }
            CanvasEvent::SelectionChanged { .. } => EventCategory::Selection,
            CanvasEvent::ModeChanged { .. } => EventCategory::Mode,
            CanvasEvent::ViewportChanged { .. } => EventCategory::Viewport,
            CanvasEvent::DeleteRequested { .. } => EventCategory::Delete,
            CanvasEvent::Diagnostic { .. } => EventCategory::Diagnostic,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            CanvasEvent::ZoneCreated { polygon } => {
                format!("Zone created with {} points", polygon.len())
            }
            CanvasEvent::ZoneUpdated { id, polygon } => {
                format!("Zone {} updated ({} points)", id, polygon.len())
            }
            CanvasEvent::DeviceMoved { id, position } => {
                format!("Device {} moved to {}", id, position)
            }
            CanvasEvent::DeviceRotated {
                id,
                orientation_degrees,
            } => format!("Device {} rotated to {:.0}°", id, orientation_degrees),
            CanvasEvent::SelectionChanged {
                device_ids,
                zone_id,
            } => match zone_id {
                Some(zone) => format!("Selection: {} devices, zone {}", device_ids.len(), zone),
                None => format!("Selection: {} devices", device_ids.len()),
            },
            CanvasEvent::ModeChanged { mode } => format!("Mode changed to {}", mode),
            CanvasEvent::ViewportChanged { scale, pan_offset } => {
                format!("Viewport: {:.2}x at {}", scale, pan_offset)
            }
            CanvasEvent::DeleteRequested { target } => match target {
                DeleteTarget::Device { id } => format!("Delete requested for device {}", id),
                DeleteTarget::Zone { id } => format!("Delete requested for zone {}", id),
            },
            CanvasEvent::Diagnostic { level, message } => format!("[{:?}] {}", level, message),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Zone creation and updates.
    Zone,
    /// Device moves and rotations.
    Device,
    /// Selection changes.
    Selection,
    /// Interaction mode changes.
    Mode,
    /// Pan and zoom changes.
    Viewport,
    /// Delete requests.
    Delete,
    /// Rejected operations.
    Diagnostic,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Zone => write!(f, "Zone"),
            EventCategory::Device => write!(f, "Device"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Mode => write!(f, "Mode"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Delete => write!(f, "Delete"),
            EventCategory::Diagnostic => write!(f, "Diagnostic"),
        }
    }
}

/// Target of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeleteTarget {
    /// A device.
    Device {
        /// Device id.
        id: String,
    },
    /// A whole zone.
    Zone {
        /// Zone id.
        id: String,
    },
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational; the operation was a no-op.
    Info,
    /// The operation was rejected by validation.
    Warning,
}
