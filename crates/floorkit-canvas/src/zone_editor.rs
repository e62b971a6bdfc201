//! Zone creation and vertex editing.
//!
//! Two independent pieces of state live here:
//! - the in-progress draw (rectangle anchor or polygon vertex list)
//! - the vertex-edit working copy of one existing zone
//!
//! Drags only touch the working copy. [`ZoneEditor::commit_vertex_drag`],
//! [`ZoneEditor::delete_vertex`] and [`ZoneEditor::insert_vertex`] are the
//! only calls that write to the [`ZoneStore`]. Created polygons are returned
//! to the caller, which proposes them to the host; the editor never inserts
//! new zones itself.

use floorkit_core::{Point, ScreenPoint, Zone, ZoneError, MIN_ZONE_VERTICES};

use crate::store::ZoneStore;
use crate::viewport::Viewport;

/// Default minimum zone area, as a fraction of the unit square.
pub const DEFAULT_MIN_ZONE_AREA: f64 = 1e-4;

/// In-progress zone draw.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Rectangle {
        anchor: Point,
        current: Point,
    },
    Polygon {
        vertices: Vec<Point>,
        cursor: Option<Point>,
    },
}

#[derive(Debug, Clone)]
struct VertexEdit {
    zone_id: String,
    /// Last committed polygon (closed).
    committed: Vec<Point>,
    /// Working copy (closed), mutated by drags.
    working: Vec<Point>,
}

impl VertexEdit {
    fn open_len(&self) -> usize {
        Zone::open_ring(&self.working).len()
    }
}

/// Rectangle corners in draw order, closed.
pub fn rectangle_polygon(a: Point, b: Point) -> Vec<Point> {
    vec![a, Point::new(b.x, a.y), b, Point::new(a.x, b.y), a]
}

/// Checks a closed candidate ring against the vertex floor and area epsilon.
pub fn validate_polygon(polygon: &[Point], min_area: f64) -> Result<(), ZoneError> {
    let count = Zone::distinct_vertex_count(polygon);
    if count < MIN_ZONE_VERTICES {
        return Err(ZoneError::TooFewVertices {
            count,
            required: MIN_ZONE_VERTICES,
        });
    }
    let area = Zone::ring_area(polygon);
    if area < min_area {
        return Err(ZoneError::Degenerate { area });
    }
    Ok(())
}

/// Draws new zones and edits the vertices of existing ones.
#[derive(Debug, Clone)]
pub struct ZoneEditor {
    draw: DrawState,
    edit: Option<VertexEdit>,
    min_zone_area: f64,
}

impl Default for ZoneEditor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ZONE_AREA)
    }
}

impl ZoneEditor {
    pub fn new(min_zone_area: f64) -> Self {
        Self {
            draw: DrawState::Idle,
            edit: None,
            min_zone_area: min_zone_area.max(0.0),
        }
    }

    pub fn draw_state(&self) -> &DrawState {
        &self.draw
    }

    pub fn is_drawing(&self) -> bool {
        self.draw != DrawState::Idle
    }

    /// Discards any in-progress draw. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.draw = DrawState::Idle;
        was_drawing
    }

    // ---- rectangle -----------------------------------------------------

    pub fn start_rectangle(&mut self, point: Point) {
        let anchor = point.clamped();
        tracing::debug!("Rectangle draw started at {}", anchor);
        self.draw = DrawState::Rectangle {
            anchor,
            current: anchor,
        };
    }

    /// Moves the live corner of a rectangle, or the rubber-band end of a
    /// polygon.
    pub fn update_preview(&mut self, point: Point) {
        let point = point.clamped();
        match &mut self.draw {
            DrawState::Rectangle { current, .. } => *current = point,
            DrawState::Polygon { cursor, .. } => *cursor = Some(point),
            DrawState::Idle => {}
        }
    }

    /// Finishes the rectangle at `point` and returns its closed polygon.
    ///
    /// The draw resets to idle whether or not the rectangle is accepted.
    pub fn complete_rectangle(&mut self, point: Point) -> Result<Vec<Point>, ZoneError> {
        let DrawState::Rectangle { anchor, .. } = std::mem::take(&mut self.draw) else {
            return Err(ZoneError::NoActiveDraw);
        };
        let polygon = rectangle_polygon(anchor, point.clamped());
        validate_polygon(&polygon, self.min_zone_area)?;
        tracing::info!("Rectangle zone proposed: {} -> {}", polygon[0], polygon[2]);
        Ok(polygon)
    }

    // ---- polygon -------------------------------------------------------

    pub fn start_polygon(&mut self, point: Point) {
        let first = point.clamped();
        tracing::debug!("Polygon draw started at {}", first);
        self.draw = DrawState::Polygon {
            vertices: vec![first],
            cursor: None,
        };
    }

    pub fn add_vertex(&mut self, point: Point) -> Result<(), ZoneError> {
        match &mut self.draw {
            DrawState::Polygon { vertices, .. } => {
                vertices.push(point.clamped());
                Ok(())
            }
            _ => Err(ZoneError::NoActiveDraw),
        }
    }

    /// Vertices placed so far in the polygon being drawn.
    pub fn polygon_vertices(&self) -> &[Point] {
        match &self.draw {
            DrawState::Polygon { vertices, .. } => vertices,
            _ => &[],
        }
    }

    /// Closes the polygon being drawn and returns it.
    ///
    /// With fewer than three vertices the draw stays open so the user can
    /// keep clicking. A degenerate ring ends the draw.
    pub fn close_polygon(&mut self) -> Result<Vec<Point>, ZoneError> {
        let DrawState::Polygon { vertices, .. } = &self.draw else {
            return Err(ZoneError::NoActiveDraw);
        };
        let count = Zone::distinct_vertex_count(vertices);
        if count < MIN_ZONE_VERTICES {
            return Err(ZoneError::TooFewVertices {
                count,
                required: MIN_ZONE_VERTICES,
            });
        }

        let DrawState::Polygon { vertices, .. } = std::mem::take(&mut self.draw) else {
            return Err(ZoneError::NoActiveDraw);
        };
        let polygon = Zone::close_ring(vertices);
        validate_polygon(&polygon, self.min_zone_area)?;
        tracing::info!("Polygon zone proposed with {} corners", polygon.len() - 1);
        Ok(polygon)
    }

    /// Closed preview of the current draw, for the render layer.
    ///
    /// Polygons include the rubber-band cursor point and are left open.
    pub fn preview(&self) -> Option<Vec<Point>> {
        match &self.draw {
            DrawState::Idle => None,
            DrawState::Rectangle { anchor, current } => Some(rectangle_polygon(*anchor, *current)),
            DrawState::Polygon { vertices, cursor } => {
                let mut points = vertices.clone();
                points.extend(cursor.iter().copied());
                Some(points)
            }
        }
    }

    // ---- vertex editing ------------------------------------------------

    /// Loads `zone_id` into a fresh working copy, discarding any previous one.
    pub fn begin_vertex_edit(&mut self, zone_id: &str, zones: &ZoneStore) -> Result<(), ZoneError> {
        let zone = zones.get(zone_id).ok_or_else(|| ZoneError::UnknownZone {
            id: zone_id.to_string(),
        })?;
        if self.is_dirty() {
            tracing::debug!("Discarding uncommitted vertex changes");
        }
        // Host payloads may carry an open ring; vertex 0 drags rely on the
        // closing duplicate.
        let ring = Zone::close_ring(zone.polygon.clone());
        self.edit = Some(VertexEdit {
            zone_id: zone.id.clone(),
            committed: ring.clone(),
            working: ring,
        });
        tracing::debug!("Editing zone {}", zone_id);
        Ok(())
    }

    /// Drops the working copy without writing anything.
    pub fn end_vertex_edit(&mut self) -> bool {
        self.edit.take().is_some()
    }

    pub fn editing_zone_id(&self) -> Option<&str> {
        self.edit.as_ref().map(|e| e.zone_id.as_str())
    }

    /// The closed working polygon of the zone being edited.
    pub fn working_polygon(&self) -> Option<&[Point]> {
        self.edit.as_ref().map(|e| e.working.as_slice())
    }

    /// True when the working copy differs from the last commit.
    pub fn is_dirty(&self) -> bool {
        self.edit
            .as_ref()
            .is_some_and(|e| e.working != e.committed)
    }

    /// Resets the working copy to the last committed polygon.
    pub fn discard_changes(&mut self) -> bool {
        match self.edit.as_mut() {
            Some(edit) if edit.working != edit.committed => {
                edit.working = edit.committed.clone();
                true
            }
            _ => false,
        }
    }

    fn edit_mut(&mut self) -> Result<&mut VertexEdit, ZoneError> {
        self.edit.as_mut().ok_or(ZoneError::NotEditing)
    }

    /// Moves vertex `index` of the working copy under `screen`.
    ///
    /// Nothing is written to the store until the drag is committed.
    pub fn drag_vertex(
        &mut self,
        index: usize,
        screen: ScreenPoint,
        viewport: &Viewport,
    ) -> Result<(), ZoneError> {
        let point = viewport.to_normalized(&screen);
        let edit = self.edit_mut()?;
        let len = edit.open_len();
        if index >= len {
            return Err(ZoneError::VertexOutOfRange { index, len });
        }
        edit.working[index] = point;
        if index == 0 {
            if let Some(last) = edit.working.last_mut() {
                *last = point;
            }
        }
        tracing::trace!("Vertex {} dragged to {}", index, point);
        Ok(())
    }

    /// Writes the working copy to the store.
    ///
    /// Returns the committed polygon, or `None` when nothing changed.
    pub fn commit_vertex_drag(
        &mut self,
        zones: &mut ZoneStore,
    ) -> Result<Option<(String, Vec<Point>)>, ZoneError> {
        let edit = self.edit.as_mut().ok_or(ZoneError::NotEditing)?;
        if edit.working == edit.committed {
            return Ok(None);
        }
        Self::write_back(edit, zones).map(Some)
    }

    /// Removes vertex `index` and commits immediately.
    ///
    /// Rejected, leaving the polygon untouched, when fewer than three
    /// vertices would remain.
    pub fn delete_vertex(
        &mut self,
        index: usize,
        zones: &mut ZoneStore,
    ) -> Result<(String, Vec<Point>), ZoneError> {
        let edit = self.edit.as_mut().ok_or(ZoneError::NotEditing)?;
        let mut open = Zone::open_ring(&edit.working).to_vec();
        if index >= open.len() {
            return Err(ZoneError::VertexOutOfRange {
                index,
                len: open.len(),
            });
        }
        open.remove(index);
        let remaining = Zone::close_ring(open);
        if Zone::distinct_vertex_count(&remaining) < MIN_ZONE_VERTICES {
            return Err(ZoneError::VertexFloor {
                required: MIN_ZONE_VERTICES,
            });
        }
        edit.working = remaining;
        Self::write_back(edit, zones)
    }

    /// Inserts `point` after vertex `after` and commits immediately.
    pub fn insert_vertex(
        &mut self,
        after: usize,
        point: Point,
        zones: &mut ZoneStore,
    ) -> Result<(String, Vec<Point>), ZoneError> {
        let edit = self.edit.as_mut().ok_or(ZoneError::NotEditing)?;
        let mut open = Zone::open_ring(&edit.working).to_vec();
        if after >= open.len() {
            return Err(ZoneError::VertexOutOfRange {
                index: after,
                len: open.len(),
            });
        }
        open.insert(after + 1, point.clamped());
        edit.working = Zone::close_ring(open);
        Self::write_back(edit, zones)
    }

    fn write_back(
        edit: &mut VertexEdit,
        zones: &mut ZoneStore,
    ) -> Result<(String, Vec<Point>), ZoneError> {
        let zone = zones
            .get_mut(&edit.zone_id)
            .ok_or_else(|| ZoneError::UnknownZone {
                id: edit.zone_id.clone(),
            })?;
        zone.polygon = edit.working.clone();
        edit.committed = edit.working.clone();
        tracing::info!(
            "Zone {} committed with {} corners",
            edit.zone_id,
            edit.open_len()
        );
        Ok((edit.zone_id.clone(), edit.working.clone()))
    }

    /// Index of the working-copy vertex nearest `screen` within `radius_px`.
    pub fn hit_vertex(&self, screen: ScreenPoint, radius_px: f64, viewport: &Viewport) -> Option<usize> {
        let edit = self.edit.as_ref()?;
        Zone::open_ring(&edit.working)
            .iter()
            .enumerate()
            .map(|(i, p)| (i, viewport.to_screen(p).distance_to(&screen)))
            .filter(|(_, d)| *d <= radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Re-syncs after the host reloaded the zone store.
    ///
    /// Drops the edit if its zone vanished; picks up the new polygon when
    /// there are no uncommitted changes. Returns `true` when the edit ended.
    pub fn sync_with_store(&mut self, zones: &ZoneStore) -> bool {
        let Some(edit) = self.edit.as_mut() else {
            return false;
        };
        match zones.get(&edit.zone_id) {
            None => {
                tracing::debug!("Edited zone {} vanished on reload", edit.zone_id);
                self.edit = None;
                true
            }
            Some(zone) => {
                if edit.working == edit.committed {
                    edit.committed = Zone::close_ring(zone.polygon.clone());
                    edit.working = edit.committed.clone();
                }
                false
            }
        }
    }
}
