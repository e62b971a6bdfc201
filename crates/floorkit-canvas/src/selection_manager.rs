use floorkit_core::{ScreenPoint, ScreenRect, SelectionError, SelectionState};

use crate::store::DeviceStore;
use crate::viewport::Viewport;

/// Default lasso growth before hit-testing, in pixels.
pub const LASSO_TOLERANCE_PX: f64 = 5.0;
/// Default minimum lasso extent, in pixels.
pub const MIN_DRAG_PX: f64 = 5.0;

/// Direction for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Previous,
}

/// Manages device/zone selection state and selection gestures.
///
/// `SelectionManager` is responsible for:
/// - Single click selection, with Shift/Ctrl/Cmd toggling membership
/// - Lasso (drag rectangle) selection in screen space
/// - Keyboard navigation over the id-ordered device list
/// - Escape handling
///
/// # Selection Model
///
/// - **Devices**: any number of device ids may be selected
/// - **Primary**: the device keyboard navigation moves from (last clicked)
/// - **Zone**: at most one zone, plus the active vertex while editing it
///
/// Every operation returns `true` when the observable selection (device ids
/// or zone id) changed, so the caller knows when to publish
/// `SelectionChanged`.
///
/// Hit-testing and navigation always run over the full device store,
/// never over the culled render set.
#[derive(Debug, Clone)]
pub struct SelectionManager {
    state: SelectionState,
    primary: Option<String>,
    lasso: Option<(ScreenPoint, ScreenPoint)>,
    lasso_tolerance_px: f64,
    min_drag_px: f64,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(LASSO_TOLERANCE_PX, MIN_DRAG_PX)
    }
}

impl SelectionManager {
    /// Creates a manager with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use floorkit_canvas::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new(5.0, 5.0);
    /// assert!(manager.selection().is_empty());
    /// ```
    pub fn new(lasso_tolerance_px: f64, min_drag_px: f64) -> Self {
        Self {
            state: SelectionState::default(),
            primary: None,
            lasso: None,
            lasso_tolerance_px,
            min_drag_px,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.state
    }

    /// Device ids in ascending order.
    pub fn selected_device_ids(&self) -> Vec<String> {
        self.state.selected_device_ids.iter().cloned().collect()
    }

    pub fn selected_zone_id(&self) -> Option<&str> {
        self.state.selected_zone_id.as_deref()
    }

    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Handles a click on a device.
    ///
    /// Without `union` the selection becomes exactly `{id}` and any zone
    /// selection is dropped. With `union` the device's membership is toggled.
    pub fn click_device(&mut self, id: &str, union: bool) -> bool {
        if union {
            if self.state.selected_device_ids.remove(id) {
                if self.primary.as_deref() == Some(id) {
                    self.primary = self.state.selected_device_ids.iter().next_back().cloned();
                }
            } else {
                self.state.selected_device_ids.insert(id.to_string());
                self.primary = Some(id.to_string());
            }
            return true;
        }

        let already_only = self.state.single_device() == Some(id)
            && self.state.selected_zone_id.is_none();
        self.primary = Some(id.to_string());
        if already_only {
            return false;
        }
        self.state.selected_device_ids.clear();
        self.state.selected_device_ids.insert(id.to_string());
        self.state.selected_zone_id = None;
        self.state.active_vertex_index = None;
        true
    }

    /// Replaces the device selection with `ids` (programmatic selection).
    pub fn select_devices<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.state.selected_device_ids.clone();
        self.state.selected_device_ids = ids.into_iter().map(Into::into).collect();
        self.primary = self.state.selected_device_ids.iter().next().cloned();
        before != self.state.selected_device_ids
    }

    /// Selects (or deselects with `None`) a zone, resetting the active vertex.
    pub fn select_zone(&mut self, zone_id: Option<&str>) -> bool {
        self.state.active_vertex_index = None;
        if self.state.selected_zone_id.as_deref() == zone_id {
            return false;
        }
        self.state.selected_zone_id = zone_id.map(str::to_string);
        true
    }

    /// Marks the vertex the user last grabbed in the edited zone.
    pub fn set_active_vertex(&mut self, index: Option<usize>) {
        self.state.active_vertex_index = index;
    }

    /// Clears devices and zone.
    pub fn clear(&mut self) -> bool {
        let changed = !self.state.is_empty();
        self.state = SelectionState::default();
        self.primary = None;
        changed
    }

    /// Escape: aborts an in-progress lasso and clears the selection.
    pub fn escape(&mut self) -> bool {
        self.lasso = None;
        self.clear()
    }

    // ---- lasso ---------------------------------------------------------

    pub fn begin_lasso(&mut self, start: ScreenPoint) {
        self.lasso = Some((start, start));
    }

    pub fn update_lasso(&mut self, current: ScreenPoint) {
        if let Some((_, end)) = self.lasso.as_mut() {
            *end = current;
        }
    }

    pub fn is_lasso_active(&self) -> bool {
        self.lasso.is_some()
    }

    /// The rectangle currently being dragged, for the render layer.
    pub fn lasso_rect(&self) -> Option<ScreenRect> {
        self.lasso
            .map(|(start, end)| ScreenRect::from_corners(start, end))
    }

    /// Drops an in-progress lasso without touching the selection.
    pub fn cancel_lasso(&mut self) -> bool {
        self.lasso.take().is_some()
    }

    /// Devices whose current screen position lies in `rect` grown by the
    /// lasso tolerance, in ascending id order.
    pub fn devices_in_rect(
        &self,
        rect: &ScreenRect,
        viewport: &Viewport,
        devices: &DeviceStore,
    ) -> Vec<String> {
        let hit_rect = rect.expand(self.lasso_tolerance_px);
        devices
            .iter()
            .filter(|d| hit_rect.contains(viewport.to_screen(&d.position)))
            .map(|d| d.id.clone())
            .collect()
    }

    /// Ends the lasso at `end` and applies it.
    ///
    /// Releases smaller than the minimum drag size on both axes return
    /// [`SelectionError::DragTooSmall`] and leave the selection alone.
    pub fn finish_lasso(
        &mut self,
        end: ScreenPoint,
        union: bool,
        viewport: &Viewport,
        devices: &DeviceStore,
    ) -> Result<bool, SelectionError> {
        let Some((start, _)) = self.lasso.take() else {
            return Ok(false);
        };
        let rect = ScreenRect::from_corners(start, end);
        if rect.width() < self.min_drag_px && rect.height() < self.min_drag_px {
            return Err(SelectionError::DragTooSmall {
                width: rect.width(),
                height: rect.height(),
            });
        }

        let matched = self.devices_in_rect(&rect, viewport, devices);
        tracing::debug!("Lasso matched {} devices", matched.len());

        if union {
            let before = self.state.selected_device_ids.len();
            if let Some(last) = matched.last() {
                self.primary = Some(last.clone());
            }
            self.state.selected_device_ids.extend(matched);
            return Ok(self.state.selected_device_ids.len() != before);
        }

        let had_zone = self.state.selected_zone_id.is_some();
        let changed = self.select_devices(matched) || had_zone;
        self.state.selected_zone_id = None;
        self.state.active_vertex_index = None;
        Ok(changed)
    }

    // ---- keyboard navigation -------------------------------------------

    /// Moves the single selection to the neighbouring device in id order.
    ///
    /// No-op at either end of the list. With nothing selected, `Next` picks
    /// the first device and `Previous` the last.
    pub fn navigate(&mut self, direction: NavDirection, devices: &DeviceStore) -> bool {
        let ids: Vec<&str> = devices.ids().collect();
        if ids.is_empty() {
            return false;
        }

        let current = self
            .primary
            .as_deref()
            .filter(|id| self.state.selected_device_ids.contains(*id))
            .or_else(|| self.state.single_device());

        let target = match current.and_then(|id| ids.iter().position(|c| *c == id)) {
            Some(index) => match direction {
                NavDirection::Next => ids.get(index + 1).copied(),
                NavDirection::Previous => index.checked_sub(1).and_then(|i| ids.get(i).copied()),
            },
            None => match direction {
                NavDirection::Next => ids.first().copied(),
                NavDirection::Previous => ids.last().copied(),
            },
        };

        match target {
            Some(id) => {
                let id = id.to_string();
                self.click_device(&id, false)
            }
            None => false,
        }
    }

    /// Drops ids that no longer exist after a store reload.
    pub fn retain_existing(
        &mut self,
        device_exists: impl Fn(&str) -> bool,
        zone_exists: impl Fn(&str) -> bool,
    ) -> bool {
        let before = self.state.clone();
        self.state
            .selected_device_ids
            .retain(|id| device_exists(id));
        if self
            .state
            .selected_zone_id
            .as_deref()
            .is_some_and(|id| !zone_exists(id))
        {
            self.state.selected_zone_id = None;
            self.state.active_vertex_index = None;
        }
        if self.primary.as_deref().is_some_and(|id| !device_exists(id)) {
            self.primary = None;
        }
        before.selected_device_ids != self.state.selected_device_ids
            || before.selected_zone_id != self.state.selected_zone_id
    }
}
