//! # FloorKit
//!
//! A headless, interactive floor-plan canvas engine:
//! - Pan and zoom anchored to the background image's display bounds
//! - Click, lasso and keyboard selection of devices
//! - Rectangle and polygon zone drawing, vertex editing
//! - Viewport culling and tooltip layout
//!
//! ## Architecture
//!
//! FloorKit is organized as a workspace with multiple crates:
//!
//! 1. **floorkit-core** - Geometry, data model, errors, event bus
//! 2. **floorkit-settings** - Engine configuration, capability flags, theme
//! 3. **floorkit-canvas** - Viewport, culler, selection, zone editor, tooltips,
//!    and the `Canvas` interaction-mode controller
//! 4. **floorkit** - This facade plus the `floorkit-replay` binary, which
//!    drives a canvas from a JSON script
//!
//! The host owns rendering and persistence: it feeds [`InputEvent`]s into a
//! [`Canvas`], paints the returned [`RenderLayer`]s and applies the
//! [`CanvasEvent`]s it publishes.

pub mod replay;

pub use floorkit_canvas as canvas;
pub use floorkit_settings as settings;

pub use floorkit_core::{
    CanvasEvent, DeleteTarget, Device, DeviceCategory, DiagnosticLevel, DisplayBounds, Error,
    EventBus, EventFilter, InteractionMode, NormalizedRect, PersonMarker, Point, Result,
    ScreenPoint, ScreenRect, SelectionState, ViewportState, Zone,
};

pub use floorkit_canvas::{
    Canvas, Gesture, HitTarget, InputEvent, Key, Modifiers, PointerButton, RenderLayer,
    SelectionManager, TooltipLayout, TooltipLayoutEngine, Viewport, ViewportCuller, ZoneEditor,
};

pub use floorkit_settings::{
    Capabilities, EngineConfig, InteractionSettings, Theme, TooltipDetailLevel, TooltipSettings,
    ViewportSettings,
};

pub use replay::{ReplayCommand, ReplayOutcome, ReplayScript, ReplayStep};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Human-readable output on stderr
/// - RUST_LOG environment variable support (defaults to `info`)
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Initialize logging with one JSON object per line on stderr.
pub fn init_logging_json() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(false);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
