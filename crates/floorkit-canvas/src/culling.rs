//! Viewport culling for render-cost reduction.
//!
//! The culler inverse-transforms the padded viewport corners into a
//! normalized rectangle and keeps the entities inside it. Results are cached
//! against a key built from the viewport and store revisions, so a frame with
//! no pan/zoom/resize/data change does no work.
//!
//! Culling only decides what gets drawn. Selection and keyboard navigation
//! always run over the full stores.

use floorkit_core::{DisplayBounds, NormalizedRect, ViewportState};

use crate::store::{DeviceStore, PeopleStore, ZoneStore};
use crate::viewport::Viewport;

/// Default padding around the viewport, in pixels.
pub const DEFAULT_CULL_PADDING: f64 = 200.0;

/// Counters describing the last cull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Devices + zones + people considered.
    pub total: usize,
    /// Entities kept.
    pub visible: usize,
    /// How many times the visible sets were rebuilt.
    pub recomputations: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct CullKey {
    state: ViewportState,
    width: f64,
    height: f64,
    bounds: Option<DisplayBounds>,
    padding: f64,
    devices: u64,
    zones: u64,
    people: u64,
}

/// Caches the visible subset of each store.
#[derive(Debug, Clone)]
pub struct ViewportCuller {
    padding_px: f64,
    key: Option<CullKey>,
    visible_rect: NormalizedRect,
    devices: Vec<String>,
    zones: Vec<String>,
    people: Vec<String>,
    stats: CullStats,
}

impl Default for ViewportCuller {
    fn default() -> Self {
        Self::new(DEFAULT_CULL_PADDING)
    }
}

impl ViewportCuller {
    pub fn new(padding_px: f64) -> Self {
        Self {
            padding_px: padding_px.max(0.0),
            key: None,
            visible_rect: NormalizedRect::default(),
            devices: Vec::new(),
            zones: Vec::new(),
            people: Vec::new(),
            stats: CullStats::default(),
        }
    }

    pub fn padding_px(&self) -> f64 {
        self.padding_px
    }

    /// Recomputes the visible sets if anything they depend on changed.
    ///
    /// Returns `true` when a recomputation happened.
    pub fn update(
        &mut self,
        viewport: &Viewport,
        devices: &DeviceStore,
        zones: &ZoneStore,
        people: &PeopleStore,
    ) -> bool {
        let key = CullKey {
            state: viewport.state(),
            width: viewport.viewport_width(),
            height: viewport.viewport_height(),
            bounds: viewport.display_bounds().copied(),
            padding: self.padding_px,
            devices: devices.revision(),
            zones: zones.revision(),
            people: people.revision(),
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }

        let rect = viewport.visible_rect(self.padding_px);
        self.devices = devices
            .iter()
            .filter(|d| rect.contains(&d.position))
            .map(|d| d.id.clone())
            .collect();
        self.people = people
            .iter()
            .filter(|p| rect.contains(&p.position))
            .map(|p| p.id.clone())
            .collect();
        self.zones = zones
            .iter()
            .filter(|z| z.bounds().is_some_and(|b| b.intersects(&rect)))
            .map(|z| z.id.clone())
            .collect();

        self.visible_rect = rect;
        self.stats.total = devices.len() + zones.len() + people.len();
        self.stats.visible = self.devices.len() + self.zones.len() + self.people.len();
        self.stats.recomputations += 1;
        self.key = Some(key);

        tracing::trace!(
            "Culled to {}/{} entities",
            self.stats.visible,
            self.stats.total
        );
        true
    }

    /// Forgets the cached key so the next update recomputes.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// The padded view rectangle in normalized coordinates.
    pub fn visible_rect(&self) -> NormalizedRect {
        self.visible_rect
    }

    /// Visible device ids, ascending.
    pub fn visible_devices(&self) -> &[String] {
        &self.devices
    }

    pub fn visible_zones(&self) -> &[String] {
        &self.zones
    }

    pub fn visible_people(&self) -> &[String] {
        &self.people
    }

    pub fn stats(&self) -> CullStats {
        self.stats
    }
}
