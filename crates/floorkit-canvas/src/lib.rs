//! # FloorKit Canvas
//!
//! The interactive floor-plan engine: pan/zoom, device selection, zone
//! drawing and vertex editing, tooltips. It consumes normalized input events
//! and produces render layers plus committed-change events; it never draws
//! pixels or talks to storage itself.
//!
//! ## Core Components
//!
//! - **Viewport**: normalized ↔ pixel transform anchored to the
//!   background's display bounds, with zoom-to-cursor
//! - **ViewportCuller**: the subset of entities worth drawing
//! - **SelectionManager**: click, lasso and keyboard selection
//! - **ZoneEditor**: rectangle/polygon creation and vertex editing
//! - **TooltipLayoutEngine**: tooltip size and placement estimates
//! - **Canvas**: owns all of the above and routes input by interaction mode
//!
//! ## Architecture
//!
//! ```text
//! InputEvent ──> Canvas (mode + captured gesture)
//!                  ├── Viewport
//!                  ├── SelectionManager ──┐
//!                  ├── ZoneEditor ────────┼──> EventBus (CanvasEvent)
//!                  ├── Stores (devices, zones, people)
//!                  └── ViewportCuller ──> render layers
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use floorkit_canvas::{Canvas, InputEvent, Modifiers, PointerButton};
//! use floorkit_core::{Device, DeviceCategory, Point, ScreenPoint};
//! use floorkit_settings::EngineConfig;
//!
//! let mut canvas = Canvas::new(EngineConfig::default(), 800.0, 600.0);
//! canvas.set_devices([Device::new("cam-1", Point::new(0.5, 0.5), DeviceCategory::Camera)]);
//!
//! canvas.handle(InputEvent::PointerDown {
//!     position: ScreenPoint::new(400.0, 300.0),
//!     button: PointerButton::Primary,
//!     modifiers: Modifiers::NONE,
//! });
//! assert_eq!(canvas.selection().selected_device_ids(), vec!["cam-1"]);
//! ```

pub mod canvas;
pub mod culling;
pub mod input;
pub mod render;
pub mod selection_manager;
pub mod store;
pub mod tooltip;
pub mod viewport;
pub mod zone_editor;

pub use canvas::{Canvas, Gesture, HitTarget, HoverTarget};
pub use culling::{CullStats, ViewportCuller};
pub use input::{InputEvent, Key, Modifiers, PointerButton};
pub use render::{
    build_layers, DeviceGlyph, PersonGlyph, RenderContext, RenderLayer, VertexHandle, ZoneShape,
};
pub use selection_manager::{NavDirection, SelectionManager};
pub use store::{DeviceStore, Entity, EntityStore, PeopleStore, ZoneStore};
pub use tooltip::{TooltipContent, TooltipLayout, TooltipLayoutEngine, TooltipLine};
pub use viewport::Viewport;
pub use zone_editor::{DrawState, ZoneEditor};
