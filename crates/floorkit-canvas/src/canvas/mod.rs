//! Canvas: the interaction-mode controller.
//!
//! [`Canvas`] owns the viewport, culler, selection manager, zone editor and
//! entity snapshots, tracks the current [`InteractionMode`], and routes every
//! [`InputEvent`] to the component the mode calls for. Committed changes are
//! published on the canvas's own [`EventBus`].

mod operations;
mod types;

pub use types::{Gesture, HitTarget, HoverTarget};

use std::sync::Arc;

use floorkit_core::{
    CanvasEvent, Device, DiagnosticLevel, Error, EventBus, InteractionMode, NormalizedRect,
    PersonMarker, Result, SelectionError, Zone,
};
use floorkit_settings::{EngineConfig, Theme};

use crate::culling::ViewportCuller;
use crate::input::{InputEvent, Key};
use crate::render::{build_layers, RenderContext, RenderLayer};
use crate::selection_manager::{NavDirection, SelectionManager};
use crate::store::{DeviceStore, PeopleStore, ZoneStore};
use crate::tooltip::{TooltipContent, TooltipLayout, TooltipLayoutEngine};
use crate::viewport::Viewport;
use crate::zone_editor::ZoneEditor;

/// Padding used by [`Canvas::zoom_to_selection`] and [`Canvas::fit_all`].
const FIT_PADDING: f64 = 0.1;

/// Interactive floor-plan canvas.
#[derive(Debug)]
pub struct Canvas {
    config: EngineConfig,
    viewport: Viewport,
    culler: ViewportCuller,
    selection: SelectionManager,
    zone_editor: ZoneEditor,
    tooltips: TooltipLayoutEngine,
    devices: DeviceStore,
    zones: ZoneStore,
    people: PeopleStore,
    events: Arc<EventBus>,
    mode: InteractionMode,
    gesture: Gesture,
    text_focus: bool,
    space_held: bool,
    hover: Option<HoverTarget>,
}

/// Falls back to the default tuning when `config` does not validate.
/// Capability flags are kept.
fn checked_config(config: EngineConfig) -> EngineConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            tracing::warn!("{}; using default engine settings", err);
            EngineConfig {
                capabilities: config.capabilities,
                ..EngineConfig::default()
            }
        }
    }
}

impl Canvas {
    /// Creates a canvas with its own event bus.
    ///
    /// A config that fails validation is replaced by the defaults.
    pub fn new(config: EngineConfig, viewport_width: f64, viewport_height: f64) -> Self {
        Self::with_event_bus(
            config,
            viewport_width,
            viewport_height,
            Arc::new(EventBus::new()),
        )
    }

    /// Creates a canvas publishing on `events`.
    pub fn with_event_bus(
        config: EngineConfig,
        viewport_width: f64,
        viewport_height: f64,
        events: Arc<EventBus>,
    ) -> Self {
        let config = checked_config(config);
        let interaction = &config.interaction;
        let viewport = Viewport::new(viewport_width, viewport_height)
            .with_scale_limits(config.viewport.min_scale, config.viewport.max_scale);
        Self {
            viewport,
            culler: ViewportCuller::new(config.viewport.cull_padding_px),
            selection: SelectionManager::new(
                interaction.lasso_tolerance_px,
                interaction.min_drag_px,
            ),
            zone_editor: ZoneEditor::new(interaction.min_zone_area),
            tooltips: TooltipLayoutEngine::new(config.tooltip.clone()),
            devices: DeviceStore::new(),
            zones: ZoneStore::new(),
            people: PeopleStore::new(),
            events,
            mode: InteractionMode::Select,
            gesture: Gesture::Idle,
            text_focus: false,
            space_held: false,
            hover: None,
            config,
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn zone_editor(&self) -> &ZoneEditor {
        &self.zone_editor
    }

    pub fn culler(&self) -> &ViewportCuller {
        &self.culler
    }

    pub fn devices(&self) -> &DeviceStore {
        &self.devices
    }

    pub fn zones(&self) -> &ZoneStore {
        &self.zones
    }

    pub fn people(&self) -> &PeopleStore {
        &self.people
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    // ---- event plumbing ----------------------------------------------------

    fn emit(&self, event: CanvasEvent) {
        if self.events.publish(event).is_err() {
            tracing::trace!("Canvas event dropped: no subscribers");
        }
    }

    fn emit_selection(&self) {
        self.emit(CanvasEvent::SelectionChanged {
            device_ids: self.selection.selected_device_ids(),
            zone_id: self.selection.selected_zone_id().map(str::to_string),
        });
    }

    fn emit_viewport(&self) {
        let state = self.viewport.state();
        self.emit(CanvasEvent::ViewportChanged {
            scale: state.scale,
            pan_offset: state.pan_offset,
        });
    }

    /// Logs a rejected operation and tells the host about it.
    fn report(&self, err: Error) {
        tracing::warn!("{}", err);
        self.emit(CanvasEvent::Diagnostic {
            level: DiagnosticLevel::Warning,
            message: err.to_string(),
        });
    }

    fn notice(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.emit(CanvasEvent::Diagnostic {
            level: DiagnosticLevel::Info,
            message,
        });
    }

    // ---- input -------------------------------------------------------------

    /// Handles one input event. Never fails; rejected operations become
    /// `Diagnostic` events.
    pub fn handle(&mut self, event: InputEvent) {
        tracing::trace!("Input {} in {} mode", event.kind(), self.mode);
        let result = match event {
            InputEvent::PointerDown {
                position,
                button,
                modifiers,
            } => self.on_pointer_down(position, button, modifiers),
            InputEvent::PointerMove { position, .. } => self.on_pointer_move(position),
            InputEvent::PointerUp {
                position,
                modifiers,
                ..
            } => self.on_pointer_up(position, modifiers),
            InputEvent::DoubleClick { position, .. } => self.on_double_click(position),
            InputEvent::Wheel {
                position, delta_y, ..
            } => {
                let factor = self
                    .config
                    .interaction
                    .wheel_zoom_base
                    .powf(-delta_y / 100.0);
                if self.viewport.zoom_at(position, factor) {
                    self.emit_viewport();
                }
                Ok(())
            }
            InputEvent::KeyDown { key, .. } => self.on_key_down(key),
            InputEvent::KeyUp { key, .. } => {
                if key == Key::Space {
                    self.space_held = false;
                }
                Ok(())
            }
            InputEvent::Resize { width, height } => {
                self.viewport.set_viewport_size(width, height);
                Ok(())
            }
            InputEvent::DisplayBoundsChanged { bounds } => {
                self.viewport.set_display_bounds(bounds);
                if self.viewport.is_fallback() {
                    tracing::debug!("Display bounds unknown; using raw viewport size");
                }
                Ok(())
            }
            InputEvent::ThemeChanged { theme } => {
                self.config.theme = theme;
                Ok(())
            }
            InputEvent::FocusChanged { text_entry } => {
                self.text_focus = text_entry;
                Ok(())
            }
        };

        if let Err(err) = result {
            self.report(err);
        }
    }

    fn on_key_down(&mut self, key: Key) -> Result<()> {
        if self.text_focus {
            tracing::trace!("Key {:?} ignored: text entry has focus", key);
            return Ok(());
        }
        match key {
            Key::Escape => {
                self.escape();
                Ok(())
            }
            Key::ArrowDown => {
                self.navigate(NavDirection::Next);
                Ok(())
            }
            Key::ArrowUp => {
                self.navigate(NavDirection::Previous);
                Ok(())
            }
            Key::Enter if self.mode == InteractionMode::DrawPolygon => self.close_polygon(),
            Key::Delete | Key::Backspace if self.mode == InteractionMode::Edit => {
                match self.selection.selection().active_vertex_index {
                    Some(index) => self.delete_vertex(index),
                    None => Ok(()),
                }
            }
            Key::Space => {
                self.space_held = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn navigate(&mut self, direction: NavDirection) {
        if !self.gesture.is_idle() {
            return;
        }
        if self.selection.navigate(direction, &self.devices) {
            tracing::debug!("Keyboard navigation to {:?}", self.selection.primary());
            self.emit_selection();
        }
    }

    /// Cancels the captured gesture or in-progress draw, then clears the
    /// selection when in select mode.
    fn escape(&mut self) {
        let cancelled = self.cancel_gesture();
        let draw_cancelled = self.zone_editor.cancel();
        if cancelled || draw_cancelled {
            tracing::debug!("Escape cancelled the active gesture");
        }
        if self.mode == InteractionMode::Select && self.selection.escape() {
            self.emit_selection();
        }
    }

    /// Drops the captured gesture without committing anything.
    fn cancel_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Lasso => {
                self.selection.cancel_lasso();
                true
            }
            Gesture::VertexDrag { .. } => {
                self.zone_editor.discard_changes();
                true
            }
            Gesture::RectangleDraw => {
                self.zone_editor.cancel();
                true
            }
            Gesture::StagePan { moved, .. } => {
                // Pan is applied live; report where it ended up.
                if moved {
                    self.emit_viewport();
                }
                true
            }
            Gesture::DeviceDrag { .. } => true,
        }
    }

    // ---- commands ----------------------------------------------------------

    /// Switches interaction mode.
    ///
    /// Setting the current mode again does nothing. Leaving a mode cancels
    /// its in-flight gesture without committing it.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode == self.mode {
            return;
        }
        if mode.needs_zones() && !self.config.capabilities.show_zones {
            self.notice(format!("{} mode is disabled on this canvas", mode));
            return;
        }

        self.cancel_gesture();
        if mode.is_draw() || self.mode.is_draw() {
            self.zone_editor.cancel();
        }
        let keeps_vertex_edit = matches!(mode, InteractionMode::Edit | InteractionMode::Delete);
        if !keeps_vertex_edit && self.zone_editor.end_vertex_edit() {
            self.selection.set_active_vertex(None);
            tracing::debug!("Left vertex edit; uncommitted changes discarded");
        }

        let previous = self.mode;
        self.mode = mode;
        tracing::info!("Mode changed: {} -> {}", previous, mode);
        self.emit(CanvasEvent::ModeChanged { mode });

        if mode == InteractionMode::Edit && self.zone_editor.editing_zone_id().is_none() {
            if let Some(zone_id) = self.selection.selected_zone_id().map(str::to_string) {
                if let Err(err) = self.zone_editor.begin_vertex_edit(&zone_id, &self.zones) {
                    self.report(err.into());
                }
            }
        }
    }

    /// Rotates a device by the configured step.
    pub fn rotate(&mut self, device_id: &str) -> Result<f64> {
        let step = self.config.interaction.rotate_step_degrees;
        let device = self
            .devices
            .get(device_id)
            .ok_or_else(|| SelectionError::UnknownDevice {
                id: device_id.to_string(),
            })?;
        if device.locked {
            return Err(SelectionError::Locked {
                id: device_id.to_string(),
            }
            .into());
        }
        let orientation = (device.orientation_degrees + step).rem_euclid(360.0);
        if let Some(device) = self.devices.get_mut(device_id) {
            device.orientation_degrees = orientation;
        }
        tracing::info!("Device {} rotated to {}\u{b0}", device_id, orientation);
        self.emit(CanvasEvent::DeviceRotated {
            id: device_id.to_string(),
            orientation_degrees: orientation,
        });
        Ok(orientation)
    }

    /// Replaces the device selection programmatically.
    pub fn select_devices<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.selection.select_devices(ids) {
            self.emit_selection();
        }
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.emit_selection();
        }
    }

    pub fn zoom_in(&mut self) {
        if self.viewport.zoom_in() {
            self.emit_viewport();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.viewport.zoom_out() {
            self.emit_viewport();
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx != 0.0 || dy != 0.0 {
            self.viewport.pan_by(dx, dy);
            self.emit_viewport();
        }
    }

    /// Back to scale 1, no pan.
    pub fn reset_view(&mut self) {
        let before = self.viewport.state();
        self.viewport.reset();
        if before != self.viewport.state() {
            self.emit_viewport();
        }
    }

    fn fit(&mut self, rect: Option<NormalizedRect>) {
        let Some(rect) = rect else {
            return;
        };
        let before = self.viewport.state();
        self.viewport.fit_to(&rect, FIT_PADDING);
        if before != self.viewport.state() {
            self.emit_viewport();
        }
    }

    /// Fits the selected devices and zone into view.
    pub fn zoom_to_selection(&mut self) {
        let state = self.selection.selection();
        let mut points: Vec<_> = state
            .selected_device_ids
            .iter()
            .filter_map(|id| self.devices.get(id))
            .map(|d| d.position)
            .collect();
        if let Some(zone) = state
            .selected_zone_id
            .as_deref()
            .and_then(|id| self.zones.get(id))
        {
            points.extend_from_slice(zone.vertices());
        }
        let rect = NormalizedRect::enclosing(points.iter());
        self.fit(rect);
    }

    /// Fits every device and zone into view.
    pub fn fit_all(&mut self) {
        let mut points: Vec<_> = self.devices.iter().map(|d| d.position).collect();
        for zone in self.zones.iter() {
            points.extend_from_slice(zone.vertices());
        }
        let rect = NormalizedRect::enclosing(points.iter());
        self.fit(rect);
    }

    // ---- store reloads -----------------------------------------------------

    fn prune_selection(&mut self) {
        let devices = &self.devices;
        let zones = &self.zones;
        if self
            .selection
            .retain_existing(|id| devices.contains(id), |id| zones.contains(id))
        {
            self.emit_selection();
        }
    }

    /// Replaces the device snapshot.
    pub fn set_devices(&mut self, devices: impl IntoIterator<Item = Device>) {
        self.devices.replace_all(devices);
        let drag_vanished = matches!(
            &self.gesture,
            Gesture::DeviceDrag { id, .. } if !self.devices.contains(id)
        );
        if drag_vanished {
            self.gesture = Gesture::Idle;
        }
        if matches!(&self.hover, Some(HoverTarget::Device(id)) if !self.devices.contains(id)) {
            self.hover = None;
        }
        tracing::debug!("Loaded {} devices", self.devices.len());
        self.prune_selection();
    }

    /// Replaces the zone snapshot, dropping working copies of vanished zones.
    pub fn set_zones(&mut self, zones: impl IntoIterator<Item = Zone>) {
        self.zones.replace_all(zones);
        if self.zone_editor.sync_with_store(&self.zones) {
            self.selection.set_active_vertex(None);
            if matches!(self.gesture, Gesture::VertexDrag { .. }) {
                self.gesture = Gesture::Idle;
            }
        }
        if matches!(&self.hover, Some(HoverTarget::Zone(id)) if !self.zones.contains(id)) {
            self.hover = None;
        }
        tracing::debug!("Loaded {} zones", self.zones.len());
        self.prune_selection();
    }

    pub fn set_people(&mut self, people: impl IntoIterator<Item = PersonMarker>) {
        self.people.replace_all(people);
    }

    // ---- output ------------------------------------------------------------

    /// Tooltip for the hovered entity, if any.
    pub fn tooltip(&self) -> Option<TooltipLayout> {
        let level = self.config.capabilities.tooltip_detail_level;
        let (content, anchor) = match self.hover.as_ref()? {
            HoverTarget::Device(id) => {
                let device = self.devices.get(id)?;
                let containing = self
                    .zones
                    .iter()
                    .filter(|z| self.config.capabilities.show_zones && z.contains(&device.position));
                (
                    TooltipContent::for_device(device, level, containing),
                    self.viewport.to_screen(&device.position),
                )
            }
            HoverTarget::Zone(id) => {
                let zone = self.zones.get(id)?;
                let inside = self.devices.iter().filter(|d| zone.contains(&d.position));
                (
                    TooltipContent::for_zone(zone, level, inside),
                    self.viewport.to_screen(&zone.centroid()?),
                )
            }
        };
        Some(self.tooltips.layout(
            &content,
            anchor,
            self.viewport.viewport_width(),
            self.viewport.viewport_height(),
        ))
    }

    /// Ordered render layers for the current frame.
    pub fn render_layers(&mut self) -> Vec<RenderLayer> {
        self.culler
            .update(&self.viewport, &self.devices, &self.zones, &self.people);

        let zones = self
            .culler
            .visible_zones()
            .iter()
            .filter_map(|id| self.zones.get(id))
            .collect();
        let devices = self
            .culler
            .visible_devices()
            .iter()
            .filter_map(|id| self.devices.get(id))
            .collect();
        let people = self
            .culler
            .visible_people()
            .iter()
            .filter_map(|id| self.people.get(id))
            .collect();
        let editing = self
            .zone_editor
            .editing_zone_id()
            .zip(self.zone_editor.working_polygon());

        let ctx = RenderContext {
            viewport: &self.viewport,
            capabilities: &self.config.capabilities,
            theme: &self.config.theme,
            selection: self.selection.selection(),
            zones,
            devices,
            people,
            editing,
            preview: self.zone_editor.preview(),
            lasso: self.selection.lasso_rect(),
            tooltip: self.tooltip(),
        };
        build_layers(&ctx)
    }
}
