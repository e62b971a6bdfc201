//! # FloorKit Core
//!
//! Core types shared by every FloorKit crate.
//! Provides the geometry primitives used on both sides of the
//! normalized/pixel boundary, the floor-plan data model (devices, zones,
//! people), error types, and the event bus the canvas engine publishes on.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod model;

pub use error::{Error, Result, SelectionError, ViewportError, ZoneError};

pub use event_bus::{
    CanvasEvent, DeleteTarget, Delivery, DiagnosticLevel, EventBus, EventBusConfig, EventBusError,
    EventCategory, EventFilter, SubscriptionId,
};

pub use geometry::{DisplayBounds, NormalizedRect, Point, ScreenPoint, ScreenRect};

pub use model::{
    Device, DeviceCategory, InteractionMode, PersonMarker, SelectionState, ViewportState, Zone,
    MIN_ZONE_VERTICES,
};
