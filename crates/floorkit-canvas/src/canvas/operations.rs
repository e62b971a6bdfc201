//! Pointer routing and hit-testing for Canvas.

use floorkit_core::{
    CanvasEvent, DeleteTarget, InteractionMode, Point, Result, ScreenPoint, SelectionError, Zone,
};

use super::types::{Gesture, HitTarget, HoverTarget};
use super::Canvas;
use crate::input::{Modifiers, PointerButton};

/// Presses closer than this to the previous polygon vertex are the second
/// half of a double-click, not a new vertex.
const DUPLICATE_PRESS_PX: f64 = 1.0;

/// Distance from `p` to segment `ab`, and the segment parameter of the
/// closest point.
fn distance_to_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> (f64, f64) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let closest = ScreenPoint::new(a.x + t * dx, a.y + t * dy);
    (closest.distance_to(&p), t)
}

impl Canvas {
    // ---- hit-testing -------------------------------------------------------

    /// Front-most entity under `position`: vertex handles, then devices,
    /// then zones.
    ///
    /// Runs over the full stores, not the culled render set.
    pub fn hit_test(&self, position: ScreenPoint) -> HitTarget {
        let interaction = &self.config.interaction;

        if matches!(self.mode, InteractionMode::Edit | InteractionMode::Delete) {
            if let Some(index) =
                self.zone_editor
                    .hit_vertex(position, interaction.vertex_hit_radius_px, &self.viewport)
            {
                return HitTarget::VertexHandle(index);
            }
        }

        let nearest_device = self
            .devices
            .iter()
            .map(|d| (d, self.viewport.to_screen(&d.position).distance_to(&position)))
            .filter(|(_, dist)| *dist <= interaction.device_hit_radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((device, _)) = nearest_device {
            return HitTarget::Device(device.id.clone());
        }

        match self.zone_at(position) {
            Some(id) => HitTarget::Zone(id),
            None => HitTarget::Empty,
        }
    }

    /// Topmost zone under `position`, ignoring devices and handles.
    fn zone_at(&self, position: ScreenPoint) -> Option<String> {
        if !self.config.capabilities.show_zones {
            return None;
        }
        let point = self.viewport.to_normalized_unclamped(&position);
        // Zones draw in ascending id order, so the last one is on top.
        self.zones
            .iter()
            .rev()
            .find(|z| z.contains(&point))
            .map(|z| z.id.clone())
    }

    /// Edge of the edited zone under `position`, with the point on it.
    fn hit_edge(&self, position: ScreenPoint) -> Option<(usize, Point)> {
        let working = self.zone_editor.working_polygon()?;
        let radius = self.config.interaction.vertex_hit_radius_px;
        let vertices = Zone::open_ring(working);
        let n = vertices.len();

        (0..n)
            .filter_map(|i| {
                let (va, vb) = (vertices[i], vertices[(i + 1) % n]);
                let (a, b) = (self.viewport.to_screen(&va), self.viewport.to_screen(&vb));
                let (dist, t) = distance_to_segment(position, a, b);
                (dist <= radius).then(|| {
                    let on_edge = Point::new(va.x + t * (vb.x - va.x), va.y + t * (vb.y - va.y));
                    (i, on_edge, dist)
                })
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(i, point, _)| (i, point))
    }

    fn update_hover(&mut self, position: ScreenPoint) {
        let target = match self.hit_test(position) {
            HitTarget::Device(id) => Some(HoverTarget::Device(id)),
            HitTarget::Zone(id) => Some(HoverTarget::Zone(id)),
            HitTarget::VertexHandle(_) | HitTarget::Empty => None,
        };
        if target != self.hover {
            tracing::trace!("Hover target: {:?}", target);
            self.hover = target;
        }
    }

    // ---- pointer down ------------------------------------------------------

    pub(super) fn on_pointer_down(
        &mut self,
        position: ScreenPoint,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> Result<()> {
        if !self.gesture.is_idle() {
            tracing::trace!("Press ignored: {} gesture captured", self.gesture.name());
            return Ok(());
        }
        self.hover = None;

        if button == PointerButton::Middle || self.space_held {
            self.gesture = Gesture::StagePan {
                last: position,
                moved: false,
            };
            return Ok(());
        }
        if button != PointerButton::Primary {
            return Ok(());
        }

        match self.mode {
            InteractionMode::Select => self.select_press(position, modifiers),
            InteractionMode::Move => self.move_press(position),
            InteractionMode::Rotate => {
                if let HitTarget::Device(id) = self.hit_test(position) {
                    self.rotate(&id)?;
                }
                Ok(())
            }
            InteractionMode::DrawRectangle => {
                let point = self.viewport.to_normalized(&position);
                self.zone_editor.start_rectangle(point);
                self.gesture = Gesture::RectangleDraw;
                Ok(())
            }
            InteractionMode::DrawPolygon => self.polygon_press(position),
            InteractionMode::Edit => {
                if let HitTarget::VertexHandle(index) = self.hit_test(position) {
                    self.selection.set_active_vertex(Some(index));
                    self.gesture = Gesture::VertexDrag { index };
                    tracing::debug!("Vertex drag started on corner {}", index);
                }
                Ok(())
            }
            InteractionMode::Delete => self.delete_press(position),
        }
    }

    fn select_press(&mut self, position: ScreenPoint, modifiers: Modifiers) -> Result<()> {
        let union = modifiers.is_union();
        match self.hit_test(position) {
            HitTarget::Device(id) => {
                if self.selection.click_device(&id, union) {
                    self.emit_selection();
                }
            }
            HitTarget::Zone(id) => {
                let mut changed = false;
                if !union {
                    changed |= self.selection.select_devices(std::iter::empty::<String>());
                }
                changed |= self.selection.select_zone(Some(&id));
                if changed {
                    self.emit_selection();
                }
            }
            HitTarget::VertexHandle(_) | HitTarget::Empty => {
                self.selection.begin_lasso(position);
                self.gesture = Gesture::Lasso;
                tracing::debug!("Lasso started at {}", position);
            }
        }
        Ok(())
    }

    fn move_press(&mut self, position: ScreenPoint) -> Result<()> {
        let HitTarget::Device(id) = self.hit_test(position) else {
            self.gesture = Gesture::StagePan {
                last: position,
                moved: false,
            };
            return Ok(());
        };

        if !self.config.capabilities.allow_device_move {
            self.notice("Moving devices is disabled on this canvas");
            return Ok(());
        }
        let device = self
            .devices
            .get(&id)
            .ok_or_else(|| SelectionError::UnknownDevice { id: id.clone() })?;
        if device.locked {
            return Err(SelectionError::Locked { id }.into());
        }
        let origin = device.position;
        let grab = self.viewport.to_normalized_unclamped(&position);

        if !self.selection.selection().contains_device(&id)
            && self.selection.click_device(&id, false)
        {
            self.emit_selection();
        }
        tracing::debug!("Device drag started on {}", id);
        self.gesture = Gesture::DeviceDrag {
            id,
            origin,
            current: origin,
            grab_offset: (origin.x - grab.x, origin.y - grab.y),
        };
        Ok(())
    }

    fn polygon_press(&mut self, position: ScreenPoint) -> Result<()> {
        let point = self.viewport.to_normalized(&position);
        let vertices = self.zone_editor.polygon_vertices();
        let count = vertices.len();
        let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) else {
            self.zone_editor.start_polygon(point);
            return Ok(());
        };

        let close_radius = self.config.interaction.polygon_close_radius_px;
        if count >= 3 && self.viewport.to_screen(&first).distance_to(&position) <= close_radius {
            return self.close_polygon();
        }
        if self.viewport.to_screen(&last).distance_to(&position) < DUPLICATE_PRESS_PX {
            return Ok(());
        }
        self.zone_editor.add_vertex(point)?;
        Ok(())
    }

    fn delete_press(&mut self, position: ScreenPoint) -> Result<()> {
        let target = match self.hit_test(position) {
            HitTarget::VertexHandle(index) => return self.delete_vertex(index),
            HitTarget::Device(id) => DeleteTarget::Device { id },
            HitTarget::Zone(id) => DeleteTarget::Zone { id },
            HitTarget::Empty => return Ok(()),
        };
        tracing::info!("Delete requested: {:?}", target);
        self.emit(CanvasEvent::DeleteRequested { target });
        Ok(())
    }

    // ---- pointer move ------------------------------------------------------

    pub(super) fn on_pointer_move(&mut self, position: ScreenPoint) -> Result<()> {
        if self.gesture.is_idle() {
            if self.mode == InteractionMode::DrawPolygon && self.zone_editor.is_drawing() {
                let point = self.viewport.to_normalized(&position);
                self.zone_editor.update_preview(point);
            }
            self.update_hover(position);
            return Ok(());
        }

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Lasso => self.selection.update_lasso(position),
            Gesture::StagePan { last, moved } => {
                let (dx, dy) = (position.x - last.x, position.y - last.y);
                if dx != 0.0 || dy != 0.0 {
                    self.viewport.pan_by(dx, dy);
                    *last = position;
                    *moved = true;
                }
            }
            Gesture::DeviceDrag {
                current,
                grab_offset,
                ..
            } => {
                let p = self.viewport.to_normalized_unclamped(&position);
                *current = Point::new(p.x + grab_offset.0, p.y + grab_offset.1).clamped();
                tracing::trace!("Device drag preview at {}", current);
            }
            Gesture::VertexDrag { index } => {
                let index = *index;
                self.zone_editor
                    .drag_vertex(index, position, &self.viewport)?;
            }
            Gesture::RectangleDraw => {
                let point = self.viewport.to_normalized(&position);
                self.zone_editor.update_preview(point);
            }
        }
        Ok(())
    }

    // ---- pointer up --------------------------------------------------------

    pub(super) fn on_pointer_up(&mut self, position: ScreenPoint, modifiers: Modifiers) -> Result<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(()),
            Gesture::Lasso => {
                let union = modifiers.is_union();
                match self
                    .selection
                    .finish_lasso(position, union, &self.viewport, &self.devices)
                {
                    Ok(changed) => {
                        if changed {
                            self.emit_selection();
                        }
                        Ok(())
                    }
                    // Too small to be a drag; the selection stays as it was.
                    Err(SelectionError::DragTooSmall { width, height }) => {
                        tracing::debug!("Lasso ignored ({:.1}x{:.1}px)", width, height);
                        Ok(())
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Gesture::StagePan { moved, .. } => {
                if moved {
                    self.emit_viewport();
                }
                Ok(())
            }
            Gesture::DeviceDrag {
                id,
                origin,
                current,
                ..
            } => {
                if current == origin {
                    return Ok(());
                }
                let device = self
                    .devices
                    .get_mut(&id)
                    .ok_or_else(|| SelectionError::UnknownDevice { id: id.clone() })?;
                device.position = current;
                tracing::info!("Device {} moved to {}", id, current);
                self.emit(CanvasEvent::DeviceMoved {
                    id,
                    position: current,
                });
                Ok(())
            }
            Gesture::VertexDrag { .. } => {
                if let Some((id, polygon)) = self.zone_editor.commit_vertex_drag(&mut self.zones)? {
                    self.emit(CanvasEvent::ZoneUpdated { id, polygon });
                }
                Ok(())
            }
            Gesture::RectangleDraw => {
                let point = self.viewport.to_normalized(&position);
                let polygon = self.zone_editor.complete_rectangle(point)?;
                self.emit(CanvasEvent::ZoneCreated { polygon });
                Ok(())
            }
        }
    }

    // ---- double click ------------------------------------------------------

    pub(super) fn on_double_click(&mut self, position: ScreenPoint) -> Result<()> {
        if !self.gesture.is_idle() {
            return Ok(());
        }
        match self.mode {
            InteractionMode::Select => {
                if let HitTarget::Zone(id) = self.hit_test(position) {
                    if self.selection.selected_zone_id() == Some(id.as_str()) {
                        self.zone_editor.begin_vertex_edit(&id, &self.zones)?;
                        self.set_mode(InteractionMode::Edit);
                    }
                }
                Ok(())
            }
            InteractionMode::Edit => {
                if let HitTarget::VertexHandle(_) = self.hit_test(position) {
                    return Ok(());
                }
                if let Some((after, point)) = self.hit_edge(position) {
                    return self.insert_vertex(after, point);
                }
                // A device sitting on the other zone does not block the switch.
                match self.zone_at(position) {
                    Some(id) if self.zone_editor.editing_zone_id() != Some(id.as_str()) => {
                        self.retarget_edit(&id)
                    }
                    _ => Ok(()),
                }
            }
            InteractionMode::DrawPolygon if self.zone_editor.is_drawing() => self.close_polygon(),
            _ => Ok(()),
        }
    }

    /// Points edit mode at another zone, dropping uncommitted changes.
    fn retarget_edit(&mut self, zone_id: &str) -> Result<()> {
        self.zone_editor.begin_vertex_edit(zone_id, &self.zones)?;
        if self.selection.select_zone(Some(zone_id)) {
            self.emit_selection();
        }
        tracing::debug!("Edit re-targeted to zone {}", zone_id);
        Ok(())
    }

    // ---- zone commits ------------------------------------------------------

    pub(super) fn close_polygon(&mut self) -> Result<()> {
        let polygon = self.zone_editor.close_polygon()?;
        self.emit(CanvasEvent::ZoneCreated { polygon });
        Ok(())
    }

    /// Deletes a corner of the edited zone and commits.
    pub fn delete_vertex(&mut self, index: usize) -> Result<()> {
        let (id, polygon) = self.zone_editor.delete_vertex(index, &mut self.zones)?;
        self.selection.set_active_vertex(None);
        self.emit(CanvasEvent::ZoneUpdated { id, polygon });
        Ok(())
    }

    /// Adds a corner to the edited zone after `after` and commits.
    pub fn insert_vertex(&mut self, after: usize, point: Point) -> Result<()> {
        let (id, polygon) = self
            .zone_editor
            .insert_vertex(after, point, &mut self.zones)?;
        self.selection.set_active_vertex(Some(after + 1));
        self.emit(CanvasEvent::ZoneUpdated { id, polygon });
        Ok(())
    }
}
