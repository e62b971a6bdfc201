//! Error handling for FloorKit
//!
//! Provides error types for the interaction layers of the canvas engine:
//! - Zone errors (creation and vertex editing)
//! - Selection errors (lasso and device lookups)
//! - Viewport errors (scale and size validation)
//!
//! None of these escape the interaction loop. The canvas turns them into
//! diagnostic events, so every variant carries a message suitable for users.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Zone error type
///
/// Represents rejected zone creations and rejected vertex edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoneError {
    /// Polygon has fewer distinct vertices than a zone needs
    #[error("A zone needs at least {required} corners, got {count}")]
    TooFewVertices {
        /// Distinct vertices supplied.
        count: usize,
        /// Minimum number of distinct vertices.
        required: usize,
    },

    /// Polygon encloses (almost) no area
    #[error("Zone is too small to create (area {area:.6})")]
    Degenerate {
        /// Enclosed area in normalized units.
        area: f64,
    },

    /// Removing the vertex would break the 3-vertex floor
    #[error("Cannot delete corner: a zone must keep at least {required} corners")]
    VertexFloor {
        /// Minimum number of distinct vertices.
        required: usize,
    },

    /// Vertex index outside the working polygon
    #[error("Corner {index} does not exist (zone has {len} corners)")]
    VertexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of distinct vertices.
        len: usize,
    },

    /// Zone not present in the store
    #[error("Zone not found: {id}")]
    UnknownZone {
        /// The missing zone id.
        id: String,
    },

    /// An operation needed an in-progress draw and there was none
    #[error("No zone is being drawn")]
    NoActiveDraw,

    /// A vertex operation ran without a zone loaded for editing
    #[error("No zone is being edited")]
    NotEditing,
}

/// Selection error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Device not present in the store
    #[error("Device not found: {id}")]
    UnknownDevice {
        /// The missing device id.
        id: String,
    },

    /// Lasso release was too small to count as a drag
    #[error("Selection rectangle too small ({width:.1}x{height:.1}px)")]
    DragTooSmall {
        /// Rectangle width in pixels.
        width: f64,
        /// Rectangle height in pixels.
        height: f64,
    },

    /// Device is locked against edits
    #[error("Device {id} is locked")]
    Locked {
        /// The locked device id.
        id: String,
    },
}

/// Viewport error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    /// Scale is not a positive finite number
    #[error("Invalid scale: {scale}")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },

    /// Viewport size is not positive
    #[error("Invalid viewport size {width}x{height}")]
    InvalidSize {
        /// The rejected width.
        width: f64,
        /// The rejected height.
        height: f64,
    },
}

/// Main error type for FloorKit
///
/// A unified error type that can represent any error from the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Zone error
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Viewport error
    #[error(transparent)]
    Viewport(#[from] ViewportError),
}

impl Error {
    /// Check if this is a zone validation error
    pub fn is_zone_error(&self) -> bool {
        matches!(self, Error::Zone(_))
    }

    /// Check if this is a selection error
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Error::Selection(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_error_display() {
        let err = ZoneError::VertexFloor { required: 3 };
        assert_eq!(
            err.to_string(),
            "Cannot delete corner: a zone must keep at least 3 corners"
        );

        let err = ZoneError::TooFewVertices {
            count: 2,
            required: 3,
        };
        assert_eq!(err.to_string(), "A zone needs at least 3 corners, got 2");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ZoneError::NoActiveDraw.into();
        assert!(err.is_zone_error());
        assert!(!err.is_selection_error());

        let err: Error = SelectionError::UnknownDevice {
            id: "cam-1".to_string(),
        }
        .into();
        assert!(err.is_selection_error());
        assert_eq!(err.to_string(), "Device not found: cam-1");
    }
}
