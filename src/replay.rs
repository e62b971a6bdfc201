//! Scripted replay of a canvas session.
//!
//! A script seeds the stores, then lists steps: raw [`InputEvent`]s (tagged
//! by `type`) or host commands (tagged by `command`). Running it collects
//! every published [`CanvasEvent`] plus the final canvas state.
//!
//! ```json
//! {
//!   "viewport_width": 1000, "viewport_height": 800,
//!   "devices": [{ "id": "cam-1", "position": { "x": 0.5, "y": 0.5 } }],
//!   "steps": [
//!     { "command": "setMode", "mode": "draw-rectangle" },
//!     { "type": "pointerDown", "position": { "x": 100, "y": 100 } },
//!     { "type": "pointerUp", "position": { "x": 400, "y": 300 } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use floorkit_canvas::{Canvas, InputEvent, RenderLayer};
use floorkit_core::{
    CanvasEvent, DeleteTarget, Device, DisplayBounds, EventFilter, InteractionMode, PersonMarker,
    SelectionState, ViewportState, Zone,
};
use floorkit_settings::EngineConfig;

fn default_width() -> f64 {
    1000.0
}

fn default_height() -> f64 {
    800.0
}

/// A replayable session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_width")]
    pub viewport_width: f64,
    #[serde(default = "default_height")]
    pub viewport_height: f64,
    #[serde(default)]
    pub display_bounds: Option<DisplayBounds>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub people: Vec<PersonMarker>,
    /// Play the host's part: store proposed zones under fresh ids and carry
    /// out delete requests.
    #[serde(default)]
    pub echo_host: bool,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// One scripted step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Input(InputEvent),
    Command(ReplayCommand),
}

/// Host-side commands issued between input events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ReplayCommand {
    SetMode { mode: InteractionMode },
    Rotate { id: String },
    SelectDevices { ids: Vec<String> },
    ClearSelection,
    ZoomIn,
    ZoomOut,
    PanBy { dx: f64, dy: f64 },
    ResetView,
    ZoomToSelection,
    FitAll,
    DeleteVertex { index: usize },
}

/// Everything a replay produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub events: Vec<CanvasEvent>,
    /// Commands the canvas refused, with the reason.
    pub rejected: Vec<String>,
    pub mode: InteractionMode,
    pub selection: SelectionState,
    pub viewport: ViewportState,
    pub zones: Vec<Zone>,
    pub devices: Vec<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<RenderLayer>>,
}

impl ReplayScript {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reads and parses a script file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay script {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("parsing replay script {}", path.display()))
    }

    /// Builds a canvas seeded with the script's stores.
    pub fn build_canvas(&self, config: EngineConfig) -> Canvas {
        let mut canvas = Canvas::new(config, self.viewport_width, self.viewport_height);
        if self.display_bounds.is_some() {
            canvas.handle(InputEvent::DisplayBoundsChanged {
                bounds: self.display_bounds,
            });
        }
        canvas.set_devices(self.devices.iter().cloned());
        canvas.set_zones(self.zones.iter().cloned());
        canvas.set_people(self.people.iter().cloned());
        canvas
    }

    /// Runs every step and collects the published events.
    pub fn run(&self, config: EngineConfig, with_layers: bool) -> ReplayOutcome {
        let mut canvas = self.build_canvas(config);

        let log: Arc<Mutex<Vec<CanvasEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let subscription = canvas
            .events()
            .subscribe(EventFilter::All, move |event| sink.lock().push(event));

        let mut host = HostEcho::default();
        let mut rejected = Vec::new();
        let mut events = Vec::new();

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!("Replay step {}: {:?}", index, step);
            if let Err(reason) = apply_step(&mut canvas, step) {
                tracing::warn!("Replay step {} rejected: {}", index, reason);
                rejected.push(format!("step {}: {}", index, reason));
            }
            let batch = std::mem::take(&mut *log.lock());
            if self.echo_host {
                host.apply(&mut canvas, &batch);
            }
            events.extend(batch);
            // Host reloads may publish follow-up events.
            events.extend(std::mem::take(&mut *log.lock()));
        }

        canvas.events().unsubscribe(subscription);
        tracing::info!(
            "Replay finished: {} steps, {} events, {} rejected",
            self.steps.len(),
            events.len(),
            rejected.len()
        );

        let layers = with_layers.then(|| canvas.render_layers());
        ReplayOutcome {
            events,
            rejected,
            mode: canvas.mode(),
            selection: canvas.selection().selection().clone(),
            viewport: canvas.viewport().state(),
            zones: canvas.zones().iter().cloned().collect(),
            devices: canvas.devices().iter().cloned().collect(),
            layers,
        }
    }
}

fn apply_step(canvas: &mut Canvas, step: &ReplayStep) -> floorkit_core::Result<()> {
    let command = match step {
        ReplayStep::Input(event) => {
            canvas.handle(event.clone());
            return Ok(());
        }
        ReplayStep::Command(command) => command,
    };
    match command {
        ReplayCommand::SetMode { mode } => canvas.set_mode(*mode),
        ReplayCommand::Rotate { id } => {
            canvas.rotate(id)?;
        }
        ReplayCommand::SelectDevices { ids } => canvas.select_devices(ids.iter().cloned()),
        ReplayCommand::ClearSelection => canvas.clear_selection(),
        ReplayCommand::ZoomIn => canvas.zoom_in(),
        ReplayCommand::ZoomOut => canvas.zoom_out(),
        ReplayCommand::PanBy { dx, dy } => canvas.pan_by(*dx, *dy),
        ReplayCommand::ResetView => canvas.reset_view(),
        ReplayCommand::ZoomToSelection => canvas.zoom_to_selection(),
        ReplayCommand::FitAll => canvas.fit_all(),
        ReplayCommand::DeleteVertex { index } => canvas.delete_vertex(*index)?,
    }
    Ok(())
}

/// Minimal stand-in for a host backend.
#[derive(Debug, Default)]
struct HostEcho {
    created: usize,
}

impl HostEcho {
    fn apply(&mut self, canvas: &mut Canvas, events: &[CanvasEvent]) {
        for event in events {
            match event {
                CanvasEvent::ZoneCreated { polygon } => {
                    self.created += 1;
                    let id = format!("zone-{}", self.created);
                    tracing::info!("Host stored new zone {}", id);
                    let mut zones: Vec<Zone> = canvas.zones().iter().cloned().collect();
                    zones.push(Zone::new(
                        id,
                        format!("Zone {}", self.created),
                        "",
                        polygon.clone(),
                    ));
                    canvas.set_zones(zones);
                }
                CanvasEvent::DeleteRequested {
                    target: DeleteTarget::Device { id },
                } => {
                    let devices: Vec<Device> = canvas
                        .devices()
                        .iter()
                        .filter(|d| &d.id != id)
                        .cloned()
                        .collect();
                    canvas.set_devices(devices);
                }
                CanvasEvent::DeleteRequested {
                    target: DeleteTarget::Zone { id },
                } => {
                    let zones: Vec<Zone> = canvas
                        .zones()
                        .iter()
                        .filter(|z| &z.id != id)
                        .cloned()
                        .collect();
                    canvas.set_zones(zones);
                }
                _ => {}
            }
        }
    }
}
